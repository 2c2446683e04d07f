use crate::session::Session;
use crate::view::{LocationView, ScopeView};
use std::path::PathBuf;
use tabled::{settings::Style, Table};
use unitloader_api::UnitSource;
use unitloader_core::LoaderConfig;

pub fn run(config: &LoaderConfig, unit_dir: PathBuf) -> anyhow::Result<()> {
    let session = Session::open(config, &unit_dir)?;
    let resolver = &session.resolver;

    println!("Unit:     {}", resolver.unit());
    println!("Root:     {}", session.unit.root().display());
    println!(
        "Header:   {}",
        session
            .unit
            .classpath_header()
            .unwrap_or_else(|| "(none)".to_string())
    );

    let locations: Vec<_> = resolver
        .locations()
        .iter()
        .map(LocationView::from_location)
        .collect();
    println!("\nClasspath ({} locations):", locations.len());
    if !locations.is_empty() {
        println!("{}", Table::new(&locations).with(Style::psql()));
    }

    let issues = &resolver.extraction().issues;
    if !issues.is_empty() {
        println!("\nSkipped entries:");
        for issue in issues {
            println!(" - {}", issue);
        }
    }

    let chain: Vec<_> = resolver
        .chain()
        .scope_names()
        .into_iter()
        .enumerate()
        .map(|(i, name)| ScopeView {
            order: i + 1,
            scope: name.to_string(),
        })
        .collect();
    println!("\nDelegation chain:");
    println!("{}", Table::new(&chain).with(Style::psql()));

    session.close();
    Ok(())
}
