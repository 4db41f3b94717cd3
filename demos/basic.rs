use contour::{ConfigMapping, Contour, ModuleRegistry, Unit};

fn on_start() -> String {
    "starting up".to_string()
}

fn main() -> Result<(), contour::Error> {
    let defaults: ConfigMapping = [
        ("session".to_string(), "demo".into()),
        ("on_start".to_string(), "demo.hooks.on_start".into()),
    ]
    .into_iter()
    .collect();

    // Reads config.yaml and config_local.yaml from the working directory when present.
    let config = Contour::builder()
        .local_config_name(contour::config::DEFAULT_LOCAL_CONFIG_NAME)
        .defaults(defaults)
        .build()?;

    for path in config.paths() {
        println!("loaded {}", path.display());
    }
    for (key, value) in &config {
        println!("{key} = {value:?}");
    }

    let mut registry = ModuleRegistry::new();
    registry.register("demo.hooks", || {
        Unit::new().with_attribute("on_start", on_start as fn() -> String)
    });

    let hook_name = config.get_as::<String>("on_start")?.unwrap_or_default();
    let hook = registry.resolve(&hook_name)?;
    if let Some(run) = hook.downcast_ref::<fn() -> String>() {
        println!("{}", run());
    }

    Ok(())
}
