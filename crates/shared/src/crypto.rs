//! Random code generation.

use rand::Rng;

/// Uppercase letters and digits, the alphabet used for ticket codes.
pub const UPPER_ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Builds a string of `len` symbols drawn uniformly from `alphabet`.
///
/// Returns an empty string when the alphabet is empty.
pub fn random_code(alphabet: &[u8], len: usize) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}
