//! Payment references.

use jiff::Timestamp;
use rand::Rng;

/// Prefix of every reference this store generates.
pub const REFERENCE_PREFIX: &str = "bb";

const SUFFIX_LEN: usize = 13;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a reference of the form `bb_<unix millis>_<random base36>`.
pub fn generate_reference<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();

    format!("{REFERENCE_PREFIX}_{}_{suffix}", now.as_millisecond())
}
