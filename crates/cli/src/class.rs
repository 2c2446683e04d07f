use crate::session::Session;
use std::path::PathBuf;
use unitloader_api::Resolver;
use unitloader_core::LoaderConfig;

pub fn run(config: &LoaderConfig, unit_dir: PathBuf, name: &str) -> anyhow::Result<()> {
    let session = Session::open(config, &unit_dir)?;
    let result = session.resolver.load_class(name);
    session.close();

    let class = result?;
    println!("Class:    {}", class.name);
    println!("Scope:    {}", class.scope);
    if let Some(location) = &class.location {
        println!("Location: {}", location);
    }
    println!("Size:     {} bytes", class.bytes.len());
    Ok(())
}
