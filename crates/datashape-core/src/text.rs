/// Normalize Windows line endings so generated text compares the same everywhere.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}
