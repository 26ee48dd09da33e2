use crate::config::AggregatorConfig;

/// One line per configured dimension: output column name and source path.
pub fn describe_dimensions(config: &AggregatorConfig) -> Vec<String> {
    let width = config
        .dimensions
        .iter()
        .map(|dimension| dimension.name.len())
        .max()
        .unwrap_or(0);

    config
        .dimensions
        .iter()
        .map(|dimension| {
            format!(
                "{:<width$}  {}",
                dimension.name,
                dimension.display_path(),
                width = width
            )
        })
        .collect()
}

pub fn handle_dimensions(config: &AggregatorConfig) {
    for line in describe_dimensions(config) {
        println!("{line}");
    }
}
