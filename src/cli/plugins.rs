use modlink::plugin::PluginRegistry;

pub fn cmd_plugins() {
    for plugin in PluginRegistry::builtin().plugins() {
        println!(
            "{:<20} {:<12} {}",
            plugin.name(),
            plugin.category().to_string(),
            plugin.description()
        );
        if let Some(arg) = plugin.argument_description() {
            println!("{:<20} {:<12} argument: {}", "", "", arg);
        }
    }
}
