use rand::{Rng, distributions::Alphanumeric};

/// Generates a random alphanumeric string of the specified length.
///
/// The generated string contains uppercase letters (A-Z), lowercase letters (a-z),
/// and digits (0-9). `thread_rng` is a CSPRNG, so the output is suitable for
/// opaque bearer secrets such as refresh tokens.
///
/// # Examples
///
/// ```ignore
/// let token = generate_random_string(64);
/// assert_eq!(token.len(), 64);
/// ```
pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
