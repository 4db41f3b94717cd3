use super::ConfigMapping;

/// Layers `defaults`, then `standard`, then `local` into one mapping.
///
/// Absent layers count as empty. Later layers win key by key, and the merge is
/// shallow: an overriding key replaces the whole value, nested mappings included.
pub fn merge(
    defaults: Option<ConfigMapping>,
    standard: Option<ConfigMapping>,
    local: Option<ConfigMapping>,
) -> ConfigMapping {
    merge_layers([defaults, standard, local].into_iter().flatten())
}

/// Merges any number of layers, lowest precedence first.
pub fn merge_layers<I>(layers: I) -> ConfigMapping
where
    I: IntoIterator<Item = ConfigMapping>,
{
    let mut merged = ConfigMapping::new();
    for layer in layers {
        merged.extend(layer);
    }
    merged
}
