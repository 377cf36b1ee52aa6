//! Hash helpers sobre blake3 (hex de 64 caracteres).

pub fn hash_bytes(input: &[u8]) -> String {
    blake3::hash(input).to_hex().to_string()
}

pub fn hash_str(input: &str) -> String {
    hash_bytes(input.as_bytes())
}
