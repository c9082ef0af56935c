use anyhow::Result;
use flowtab::block::{EmbeddedBlock, EmbeddedModule};
use flowtab::graph::{GraphContext, PortId};

struct DemoGraph;

impl GraphContext for DemoGraph {
    fn graph_id(&self) -> &str {
        "demo_graph"
    }

    fn disconnect(&mut self, ports: &[PortId]) {
        println!("  severed connections of {} port(s)", ports.len());
    }
}

fn print_shape(block: &EmbeddedBlock) {
    println!("  label: {}", block.label);
    for param in block.params() {
        println!(
            "  param {:?} = {:?} (default {:?})",
            param.id, param.value, param.default
        );
    }
    for port in block.sinks() {
        println!("  sink   {} ({}, width {})", port.name, port.tag, port.width);
    }
    for port in block.sources() {
        println!("  source {} ({}, width {})", port.name, port.tag, port.width);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut graph = DemoGraph;
    let mut block = EmbeddedBlock::new("my_block");

    println!("=== Demo 1: extract the default snippet ===");
    block.rewrite(&mut graph);
    print_shape(&block);
    println!("  imports: {}", block.templates.imports);
    println!("  make:    {}", block.templates.make);
    for callback in &block.templates.callbacks {
        println!("  callback: {}", callback);
    }

    println!("\n=== Demo 2: a broken edit keeps the shape ===");
    block.set_source("function ( this is not lua");
    block.rewrite(&mut graph);
    block.validate();
    if let Some(error) = block.reload_error() {
        println!("  reload error: {}", error);
    }
    print_shape(&block);

    println!("\n=== Demo 3: fixing the snippet clears the error ===");
    block.set_source(flowtab::block::DEFAULT_CODE);
    block.rewrite(&mut graph);
    block.validate();
    println!("  valid again: {}", block.is_valid());

    println!("\n=== Demo 4: a shared scripted module ===");
    let mut module = EmbeddedModule::new("stuff");
    module.set_source("return { gain = 2 }");
    module.rewrite(&graph);
    println!("  module:  {}", module.module_name);
    println!("  imports: {}", module.templates.imports);

    Ok(())
}
