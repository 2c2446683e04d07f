use crate::session::Session;
use anyhow::anyhow;
use std::path::PathBuf;
use unitloader_api::Resolver;
use unitloader_core::LoaderConfig;

pub fn run(config: &LoaderConfig, unit_dir: PathBuf, name: &str, all: bool) -> anyhow::Result<()> {
    let session = Session::open(config, &unit_dir)?;
    let found: Vec<_> = if all {
        session.resolver.get_all_resources(name).collect()
    } else {
        session.resolver.get_resource(name).into_iter().collect()
    };
    session.close();

    if found.is_empty() {
        return Err(anyhow!("resource not found: {}", name));
    }
    for url in found {
        println!("{}", url);
    }
    Ok(())
}
