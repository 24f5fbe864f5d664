//! Catalog
//!
//! An immutable snapshot of the track collection and the pure queries the
//! storefront runs against it. All text matching is case-insensitive.

use rand::{Rng, seq::SliceRandom};
use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};

use crate::tracks::Track;

/// Combined storefront filter.
///
/// Fields are applied in order: free-text query, exact genre, exact tag. Blank
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackFilter {
    /// Substring matched against title, tags, genre, description and artist
    pub query: Option<String>,

    /// Exact genre
    pub genre: Option<String>,

    /// Exact tag
    pub tag: Option<String>,
}

impl TrackFilter {
    /// Whether no field narrows the result.
    pub fn is_empty(&self) -> bool {
        non_blank(self.query.as_deref()).is_none()
            && non_blank(self.genre.as_deref()).is_none()
            && non_blank(self.tag.as_deref()).is_none()
    }
}

/// Track catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Create a catalog from tracks in content store order.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// All tracks.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Consume the catalog, returning its tracks.
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    /// Number of tracks.
    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog has no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// First track flagged as featured.
    pub fn featured(&self) -> Option<&Track> {
        self.tracks.iter().find(|track| track.featured)
    }

    /// Track with the given id.
    pub fn by_id(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id.as_str() == id)
    }

    /// First track whose title equals `title`, ignoring case.
    pub fn by_title(&self, title: &str) -> Option<&Track> {
        let title = title.trim().to_lowercase();

        self.tracks
            .iter()
            .find(|track| track.title.to_lowercase() == title)
    }

    /// Tracks with a tag containing `tag`.
    pub fn by_tag(&self, tag: &str) -> Vec<&Track> {
        let needle = tag.to_lowercase();

        self.tracks
            .iter()
            .filter(|track| track.tags.iter().any(|t| contains(t, &needle)))
            .collect()
    }

    /// Tracks whose genre contains `genre`.
    pub fn by_genre(&self, genre: &str) -> Vec<&Track> {
        let needle = genre.to_lowercase();

        self.tracks
            .iter()
            .filter(|track| track.genre.as_deref().is_some_and(|g| contains(g, &needle)))
            .collect()
    }

    /// Tracks whose title, any tag, genre, description or artist contains `query`.
    pub fn search(&self, query: &str) -> Vec<&Track> {
        let needle = query.trim().to_lowercase();

        self.tracks
            .iter()
            .filter(|track| matches_query(track, &needle))
            .collect()
    }

    /// Apply the storefront filter.
    pub fn filter(&self, filter: &TrackFilter) -> Vec<&Track> {
        let query = non_blank(filter.query.as_deref()).map(str::to_lowercase);
        let genre = non_blank(filter.genre.as_deref());
        let tag = non_blank(filter.tag.as_deref());

        self.tracks
            .iter()
            .filter(|track| query.as_deref().is_none_or(|q| matches_query(track, q)))
            .filter(|track| genre.is_none_or(|g| track.is_genre(g)))
            .filter(|track| tag.is_none_or(|t| track.has_tag(t)))
            .collect()
    }

    /// Distinct tags, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        sorted_unique(self.tracks.iter().flat_map(|track| track.tags.iter()))
    }

    /// Distinct genres, sorted.
    pub fn all_genres(&self) -> Vec<String> {
        sorted_unique(self.tracks.iter().filter_map(|track| track.genre.as_ref()))
    }

    /// Up to `count` distinct tracks chosen uniformly at random.
    pub fn random_sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&Track> {
        self.tracks.choose_multiple(rng, count).collect()
    }

    /// Sum of the prices of the given ids. Unknown ids count as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if a track is priced in another currency.
    pub fn total_value<I, S>(
        &self,
        ids: I,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, MoneyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.by_id(id.as_ref()))
            .try_fold(Money::from_minor(0, currency), |total, track| {
                total.add(track.price)
            })
    }
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

fn matches_query(track: &Track, lowercase_needle: &str) -> bool {
    contains(&track.title, lowercase_needle)
        || track.tags.iter().any(|tag| contains(tag, lowercase_needle))
        || track
            .genre
            .as_deref()
            .is_some_and(|genre| contains(genre, lowercase_needle))
        || track
            .description
            .as_deref()
            .is_some_and(|description| contains(description, lowercase_needle))
        || track
            .artist
            .as_deref()
            .is_some_and(|artist| contains(artist, lowercase_needle))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut unique: Vec<String> = values
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect();

    unique.sort();

    unique
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rusty_money::iso::GHS;

    use super::*;
    use crate::tracks::TrackId;

    fn track(id: &str, title: &str, genre: &str, tags: &[&str], minor: i64) -> Track {
        Track {
            id: TrackId::from(id),
            title: title.to_string(),
            time: "3:00".to_string(),
            bpm: "140".to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            genre: Some(genre.to_string()),
            artist: None,
            price: Money::from_minor(minor, GHS),
            featured: false,
            image_url: None,
            audio_url: None,
            preview_url: None,
            description: None,
        }
    }

    fn catalog() -> Catalog {
        let mut featured = track("b", "Sunset Vibes", "Afrobeats", &["chill", "summer"], 2995);
        featured.featured = true;

        Catalog::new(vec![
            track("a", "Morning Trap", "Trap", &["dark", "808"], 2095),
            featured,
            track("c", "Night Shift", "UK Drill", &["dark", "UK Drill"], 3995),
        ])
    }

    #[test]
    fn featured_returns_first_flagged_track() {
        let catalog = catalog();

        assert_eq!(catalog.featured().map(|t| t.id.as_str()), Some("b"));
    }

    #[test]
    fn featured_is_none_without_flags() {
        let catalog = Catalog::new(vec![track("a", "A", "Trap", &[], 100)]);

        assert!(catalog.featured().is_none());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let catalog = catalog();

        let ids: Vec<&str> = catalog.search("DRILL").iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn filter_combines_query_genre_and_tag() {
        let catalog = catalog();

        let filter = TrackFilter {
            query: Some("dark".to_string()),
            genre: Some("trap".to_string()),
            tag: Some("808".to_string()),
        };

        let ids: Vec<&str> = catalog.filter(&filter).iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn filter_genre_is_exact_match() {
        let catalog = catalog();

        let filter = TrackFilter {
            genre: Some("Drill".to_string()),
            ..TrackFilter::default()
        };

        assert!(catalog.filter(&filter).is_empty());
        assert_eq!(catalog.by_genre("Drill").len(), 1);
    }

    #[test]
    fn blank_filter_returns_everything() {
        let catalog = catalog();
        let filter = TrackFilter {
            query: Some("  ".to_string()),
            ..TrackFilter::default()
        };

        assert!(filter.is_empty());
        assert_eq!(catalog.filter(&filter).len(), 3);
    }

    #[test]
    fn facets_are_sorted_and_unique() {
        let catalog = catalog();

        assert_eq!(
            catalog.all_tags(),
            vec!["808", "UK Drill", "chill", "dark", "summer"]
        );
        assert_eq!(catalog.all_genres(), vec!["Afrobeats", "Trap", "UK Drill"]);
    }

    #[test]
    fn random_sample_never_exceeds_catalog() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);

        let sample = catalog.random_sample(10, &mut rng);

        assert_eq!(sample.len(), 3);

        let mut ids: Vec<&str> = sample.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 3, "sample should not repeat tracks");
    }

    #[test]
    fn total_value_skips_unknown_ids() -> Result<(), MoneyError> {
        let catalog = catalog();

        let total = catalog.total_value(["a", "missing", "c"], GHS)?;

        assert_eq!(total.to_minor_units(), 2095 + 3995);

        Ok(())
    }

    #[test]
    fn by_title_ignores_case() {
        let catalog = catalog();

        assert_eq!(catalog.by_title("night shift").map(|t| t.id.as_str()), Some("c"));
    }

    #[test]
    fn exact_matches_fold_non_ascii_case() {
        let mut ebene = track("e", "Ébène Nocturne", "Électro", &["Ñandú", "dark"], 1500);
        ebene.tags.push("ÇA VA".to_string());

        assert!(ebene.has_tag("ñandú"));
        assert!(ebene.has_tag("ça va"));
        assert!(ebene.is_genre("ÉLECTRO"));
        assert!(!ebene.is_genre("electro"));

        let catalog = Catalog::new(vec![ebene]);

        assert_eq!(catalog.by_title("ébène nocturne").map(|t| t.id.as_str()), Some("e"));
        assert_eq!(
            catalog
                .filter(&TrackFilter {
                    genre: Some("électro".to_string()),
                    tag: Some("ÑANDÚ".to_string()),
                    ..TrackFilter::default()
                })
                .len(),
            1
        );
    }
}
