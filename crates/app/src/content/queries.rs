//! Content store queries.

/// Projection shared by every track query.
pub const TRACK_PROJECTION: &str = r#"{
  _id,
  title,
  time,
  bpm,
  tags,
  "imageUrl": coverImage.asset->url,
  price,
  featured,
  artist,
  genre,
  description,
  "audioUrl": audioFile.asset->url,
  "previewUrl": previewAudio.asset->url
}"#;

/// All tracks, newest first.
pub fn all_tracks() -> String {
    format!(r#"*[_type == "track"] | order(_createdAt desc) {TRACK_PROJECTION}"#)
}

/// One track by document id, bound to `$id`.
pub fn track_by_id() -> String {
    format!(r#"*[_type == "track" && _id == $id][0] {TRACK_PROJECTION}"#)
}
