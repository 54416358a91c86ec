//! One-time code and share token generation

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate a numeric one-time code of the given length (e.g. "042917")
///
/// Leading zeros are kept, so the code is always exactly `len` characters.
#[must_use]
pub fn generate_numeric_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

/// Generate an opaque alphanumeric share token of the given length
#[must_use]
pub fn generate_share_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
