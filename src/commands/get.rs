//! Implementation of the `tctl get` command.

use crate::{
    catalog::Catalog,
    commands::print_no_sources,
    diagnostics::Diagnostics,
    error::Result,
    resolver::{CyclePolicy, Event, Observer, Resolver},
};

/// Prints resolver progress as `[tctl]` lines.
struct ProgressPrinter<'a> {
    /// Receives cycle warnings.
    diagnostics: &'a mut Diagnostics,
}

impl Observer for ProgressPrinter<'_> {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::Intent { name } => println!("[tctl] intent: {name}"),
            Event::Fresh { target, message } => println!("[tctl] ✓ {target}: {message}"),
            Event::Stale { target, message } => {
                println!("[tctl] → {target}: {message}, regenerating...");
            }
            Event::Produced { tool, output, .. } => match output {
                Some(output) => println!("[tctl] ✓ {tool} → output: {output}"),
                None => println!("[tctl] ✓ {tool}"),
            },
            Event::Cycle { chain } => {
                self.diagnostics
                    .warn(format!("dependency cycle: {}", chain.join(" -> ")));
            }
        }
    }
}

/// Execute the get command.
pub async fn run(target: String, strict: bool) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let mut catalog = Catalog::load(&mut diagnostics)?;

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }

    println!("[tctl] ensuring: {target}");
    let cycles = if strict {
        CyclePolicy::Fail
    } else {
        CyclePolicy::Warn
    };
    let mut printer = ProgressPrinter {
        diagnostics: &mut diagnostics,
    };
    let result = Resolver::new(
        &catalog.scan.registry,
        catalog.config.intents(),
        &mut catalog.languages,
        &mut printer,
    )
    .with_cycle_policy(cycles)
    .ensure(&target);

    diagnostics.print_warning_summary();
    match result {
        Ok(()) => {
            println!("[tctl] ✓ done");
            Ok(())
        }
        Err(error) => {
            println!("[tctl] ✗ failed");
            Err(error)
        }
    }
}
