use uuid::Uuid;

/// Generates one version-4 UUID: 122 cryptographically random bits with the
/// version and variant bits fixed per RFC 9562.
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Batch form for the command-line adapter.
pub fn generate_many(count: usize) -> Vec<Uuid> {
    (0..count).map(|_| Uuid::new_v4()).collect()
}
