//! Recursive "ensure data is fresh" resolution over requires/provides.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::{
    config::Intent,
    error::{Error, Result},
    freshness,
    runner::Executor,
    tool::{Registry, Tool},
};

/// How a dependency cycle is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Treat the repeated target as satisfied and report the cycle.
    #[default]
    Warn,
    /// Fail the target that closes the cycle.
    Fail,
}

/// Progress reported while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An intent is being expanded.
    Intent {
        /// Intent name.
        name: String,
    },
    /// An output is fresh; nothing to do.
    Fresh {
        /// Artifact name.
        target: String,
        /// Freshness status message.
        message: String,
    },
    /// An output is missing or stale and will be regenerated.
    Stale {
        /// Artifact name.
        target: String,
        /// Freshness status message.
        message: String,
    },
    /// A tool finished producing a target.
    Produced {
        /// Artifact name.
        target: String,
        /// Tool that ran.
        tool: String,
        /// Declared output, if any.
        output: Option<String>,
    },
    /// A target was reached again while still being resolved.
    Cycle {
        /// Targets from the first visit to the repeat.
        chain: Vec<String>,
    },
}

/// Receives resolver progress.
pub trait Observer {
    /// Handle one event.
    fn on_event(&mut self, event: &Event);
}

impl Observer for Vec<Event> {
    fn on_event(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Resolves targets against a registry, producing stale data on demand.
///
/// One resolver serves one top-level command: its visited set persists
/// across calls to [`Resolver::ensure`], so each target is handled at most
/// once per resolver.
pub struct Resolver<'a> {
    /// Tools available for production.
    registry: &'a Registry,
    /// Intents available for expansion.
    intents: &'a BTreeMap<String, Intent>,
    /// Runs tools.
    executor: &'a mut dyn Executor,
    /// Receives progress events.
    observer: &'a mut dyn Observer,
    /// Cycle handling.
    cycles: CyclePolicy,
    /// Targets already handled or in progress.
    visited: HashSet<String>,
    /// Targets currently being resolved, outermost first.
    active: Vec<String>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver.
    pub fn new(
        registry: &'a Registry,
        intents: &'a BTreeMap<String, Intent>,
        executor: &'a mut dyn Executor,
        observer: &'a mut dyn Observer,
    ) -> Self {
        Self {
            registry,
            intents,
            executor,
            observer,
            cycles: CyclePolicy::default(),
            visited: HashSet::new(),
            active: Vec::new(),
        }
    }

    /// Set the cycle policy.
    pub fn with_cycle_policy(mut self, cycles: CyclePolicy) -> Self {
        self.cycles = cycles;
        self
    }

    /// Ensure `target` (an artifact or intent) and its requirements are fresh.
    pub fn ensure(&mut self, target: &str) -> Result<()> {
        if self.visited.contains(target) {
            return self.revisit(target);
        }
        self.visited.insert(target.to_string());

        self.active.push(target.to_string());
        let result = self.resolve(target);
        self.active.pop();
        result
    }

    /// Handle a target that was already visited.
    fn revisit(&mut self, target: &str) -> Result<()> {
        let Some(start) = self.active.iter().position(|active| active == target) else {
            debug!(target, "already resolved");
            return Ok(());
        };

        let mut chain = self.active[start..].to_vec();
        chain.push(target.to_string());
        match self.cycles {
            CyclePolicy::Warn => {
                self.observer.on_event(&Event::Cycle { chain });
                Ok(())
            }
            CyclePolicy::Fail => Err(Error::DependencyCycle {
                chain: chain.join(" -> "),
            }),
        }
    }

    /// Resolve a first-visit target.
    fn resolve(&mut self, target: &str) -> Result<()> {
        if let Some(intent) = self.intents.get(target) {
            debug!(target, "expanding intent");
            self.observer.on_event(&Event::Intent {
                name: target.to_string(),
            });
            for member in &intent.includes {
                self.ensure(member)?;
            }
            return Ok(());
        }

        let tool = self
            .registry
            .find_by_provides(target)
            .ok_or_else(|| Error::UnknownData {
                target: target.to_string(),
            })?;
        debug!(target, tool = %tool.name, "resolved provider");

        if let Some(output) = tool.output_path() {
            let status = freshness::check(&output, &tool.freshness);
            if status.fresh {
                self.observer.on_event(&Event::Fresh {
                    target: target.to_string(),
                    message: status.message,
                });
                return Ok(());
            }
            self.observer.on_event(&Event::Stale {
                target: target.to_string(),
                message: status.message,
            });
        }

        for requirement in &tool.requires {
            self.ensure(requirement)?;
        }

        self.produce(target, tool)
    }

    /// Run the tool that produces `target`.
    fn produce(&mut self, target: &str, tool: &Tool) -> Result<()> {
        let code = self.executor.execute(tool, &[])?;
        if code != 0 {
            return Err(Error::ProductionFailed {
                tool: tool.name.clone(),
                code,
            });
        }
        self.observer.on_event(&Event::Produced {
            target: target.to_string(),
            tool: tool.name.clone(),
            output: tool.output.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        fs,
        time::{Duration, SystemTime},
    };

    use super::{CyclePolicy, Event, Resolver};
    use crate::{
        config::Intent,
        error::{Error, Result},
        runner::Executor,
        testutil::{TestFixture, tool_source},
        tool::Tool,
    };

    /// Records tool runs and fails the named tools.
    #[derive(Default)]
    struct FakeExecutor {
        /// Tool names in run order.
        runs: Vec<String>,
        /// Tools that exit with code 2.
        failing: Vec<&'static str>,
    }

    impl Executor for FakeExecutor {
        fn execute(&mut self, tool: &Tool, args: &[String]) -> Result<i32> {
            assert!(args.is_empty());
            self.runs.push(tool.name.clone());
            if self.failing.contains(&tool.name.as_str()) {
                return Ok(2);
            }
            Ok(0)
        }
    }

    fn intents(entries: &[(&str, &[&str])]) -> BTreeMap<String, Intent> {
        entries
            .iter()
            .map(|(name, includes)| {
                (
                    name.to_string(),
                    Intent {
                        description: String::new(),
                        includes: includes.iter().map(|item| item.to_string()).collect(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn produces_requirements_first() {
        let fixture = TestFixture::new()
            .with_file("tools/a.py", &tool_source("a", &["@provides x", "@requires y"]))
            .with_file(
                "tools/b.py",
                &tool_source("b", &["@provides y", "@output out.csv", "@freshness daily"]),
            );
        let scan = fixture.scan();
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        let result = Resolver::new(&scan.registry, &no_intents, &mut executor, &mut events).ensure("x");

        assert!(result.is_ok());
        assert_eq!(executor.runs, vec!["b", "a"]);
        assert_eq!(
            events[0],
            Event::Stale {
                target: "y".to_string(),
                message: "missing".to_string()
            }
        );
    }

    #[test]
    fn fresh_output_skips_production_and_requirements() {
        let fixture = TestFixture::new()
            .with_file(
                "tools/b.py",
                &tool_source(
                    "b",
                    &["@provides y", "@requires z", "@output out.csv", "@freshness daily"],
                ),
            )
            .with_file("out.csv", "cached\n");
        let scan = fixture.scan_roots(&[fixture.path("tools")]);
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        let result = Resolver::new(&scan.registry, &no_intents, &mut executor, &mut events).ensure("y");

        assert!(result.is_ok());
        assert!(executor.runs.is_empty());
        assert!(matches!(&events[0], Event::Fresh { target, .. } if target == "y"));
    }

    #[test]
    fn unknown_data_runs_nothing() {
        let registry = TestFixture::new().scan().registry;
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        let error = Resolver::new(&registry, &no_intents, &mut executor, &mut events)
            .ensure("unknown-artifact")
            .expect_err("unknown");

        assert!(matches!(error, Error::UnknownData { ref target } if target == "unknown-artifact"));
        assert!(executor.runs.is_empty());
    }

    #[test]
    fn diamond_produces_each_target_once() {
        let fixture = TestFixture::new()
            .with_file("tools/top.py", &tool_source("top", &["@provides top", "@requires left right"]))
            .with_file("tools/left.py", &tool_source("left", &["@provides left", "@requires base"]))
            .with_file("tools/right.py", &tool_source("right", &["@provides right", "@requires base"]))
            .with_file("tools/base.py", &tool_source("base", &["@provides base"]));
        let scan = fixture.scan();
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        let mut resolver = Resolver::new(&scan.registry, &no_intents, &mut executor, &mut events);
        resolver.ensure("top").expect("ensure");
        resolver.ensure("top").expect("ensure again");
        resolver.ensure("base").expect("ensure dependency");
        drop(resolver);

        assert_eq!(executor.runs, vec!["base", "left", "right", "top"]);
        assert!(!events.iter().any(|event| matches!(event, Event::Cycle { .. })));
    }

    #[test]
    fn cycle_terminates_with_warning() {
        let fixture = TestFixture::new()
            .with_file("tools/a.py", &tool_source("a", &["@provides a", "@requires b"]))
            .with_file("tools/b.py", &tool_source("b", &["@provides b", "@requires a"]));
        let scan = fixture.scan();
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        Resolver::new(&scan.registry, &no_intents, &mut executor, &mut events)
            .ensure("a")
            .expect("cycle is suppressed");

        assert_eq!(executor.runs, vec!["b", "a"]);
        assert!(events.contains(&Event::Cycle {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()]
        }));
    }

    #[test]
    fn strict_cycle_policy_fails() {
        let fixture = TestFixture::new()
            .with_file("tools/a.py", &tool_source("a", &["@provides a", "@requires b"]))
            .with_file("tools/b.py", &tool_source("b", &["@provides b", "@requires a"]));
        let scan = fixture.scan();
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        let error = Resolver::new(&scan.registry, &no_intents, &mut executor, &mut events)
            .with_cycle_policy(CyclePolicy::Fail)
            .ensure("a")
            .expect_err("cycle");

        assert!(matches!(error, Error::DependencyCycle { ref chain } if chain == "a -> b -> a"));
        assert!(executor.runs.is_empty());
    }

    #[test]
    fn cycle_through_intent_terminates() {
        let registry = TestFixture::new().scan().registry;
        let loops = intents(&[("morning", &["evening"]), ("evening", &["morning"])]);
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        Resolver::new(&registry, &loops, &mut executor, &mut events)
            .ensure("morning")
            .expect("terminates");

        assert!(executor.runs.is_empty());
        assert!(events.iter().any(|event| matches!(event, Event::Cycle { .. })));
    }

    #[test]
    fn intents_expand_in_order_and_stop_on_failure() {
        let fixture = TestFixture::new()
            .with_file("tools/p.py", &tool_source("p", &["@provides prices"]))
            .with_file("tools/n.py", &tool_source("n", &["@provides news"]))
            .with_file("tools/w.py", &tool_source("w", &["@provides weather"]));
        let scan = fixture.scan();
        let morning = intents(&[
            ("morning", &["markets", "weather"]),
            ("markets", &["news", "prices"]),
        ]);
        let mut executor = FakeExecutor {
            failing: vec!["p"],
            ..FakeExecutor::default()
        };
        let mut events = Vec::new();

        let error = Resolver::new(&scan.registry, &morning, &mut executor, &mut events)
            .ensure("morning")
            .expect_err("prices fails");

        assert!(matches!(error, Error::ProductionFailed { ref tool, code: 2 } if tool == "p"));
        assert_eq!(executor.runs, vec!["n", "p"]);
        assert_eq!(
            events[0],
            Event::Intent {
                name: "morning".to_string()
            }
        );
    }

    #[test]
    fn failed_requirement_blocks_dependent() {
        let fixture = TestFixture::new()
            .with_file("tools/a.py", &tool_source("a", &["@provides x", "@requires y"]))
            .with_file("tools/b.py", &tool_source("b", &["@provides y"]));
        let scan = fixture.scan();
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor {
            failing: vec!["b"],
            ..FakeExecutor::default()
        };
        let mut events = Vec::new();

        let result = Resolver::new(&scan.registry, &no_intents, &mut executor, &mut events).ensure("x");

        assert!(result.is_err());
        assert_eq!(executor.runs, vec!["b"]);
    }

    #[test]
    fn stale_output_is_regenerated() {
        let fixture = TestFixture::new()
            .with_file(
                "tools/b.py",
                &tool_source("b", &["@provides y", "@output data/out.csv", "@freshness daily"]),
            )
            .with_file("data/out.csv", "old\n");
        let old = fs::File::options()
            .write(true)
            .open(fixture.path("data/out.csv"))
            .expect("open");
        let two_days_ago = SystemTime::now() - Duration::from_secs(2 * 24 * 60 * 60);
        old.set_modified(two_days_ago).expect("set mtime");
        drop(old);

        let scan = fixture.scan_roots(&[fixture.path("tools")]);
        let no_intents = BTreeMap::new();
        let mut executor = FakeExecutor::default();
        let mut events = Vec::new();

        Resolver::new(&scan.registry, &no_intents, &mut executor, &mut events)
            .ensure("y")
            .expect("ensure");

        assert_eq!(executor.runs, vec!["b"]);
        assert!(matches!(&events[0], Event::Stale { message, .. } if message == "stale (2d ago)"));
    }
}
