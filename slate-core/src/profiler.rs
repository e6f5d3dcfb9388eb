use crate::{ParameterContainer, StatementContainer, separated_by, truncate_long};
use std::{
    fmt::{self, Display},
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

/// Instrumentation hooks around the native execution of a statement.
pub trait Profiler: Send + Sync {
    fn profiler_start(&self, target: &dyn StatementContainer);
    fn profiler_finish(&self);
}

/// One profiled execution.
#[derive(Debug, Clone)]
pub struct Profile {
    pub sql: String,
    pub parameters: Option<ParameterContainer>,
    pub start: Instant,
    pub end: Option<Instant>,
    pub elapsed: Option<Duration>,
}

impl Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parameters = String::new();
        if let Some(container) = &self.parameters {
            separated_by(
                &mut parameters,
                container.iter(),
                |out, (name, value)| {
                    out.push_str(name);
                    out.push_str(" = ");
                    out.push_str(&value.to_string());
                },
                ", ",
            );
        }
        write!(f, "[{}]", parameters)?;
        if let Some(elapsed) = self.elapsed {
            write!(f, " {:?}", elapsed)?;
        }
        write!(f, " {}", truncate_long!(self.sql))
    }
}

#[derive(Default)]
struct ProfilerState {
    profiles: Vec<Profile>,
    current: Option<usize>,
}

/// Profiler keeping every execution it sees.
///
/// ```rust
/// use slate_core::{ParameterContainer, Profiler, QueryProfiler, StatementContainer};
/// struct Sql(&'static str);
/// impl StatementContainer for Sql {
///     fn sql(&self) -> &str {
///         self.0
///     }
///     fn parameter_container(&self) -> Option<&ParameterContainer> {
///         None
///     }
/// }
/// let profiler = QueryProfiler::new();
/// profiler.profiler_start(&Sql("SELECT 1"));
/// profiler.profiler_finish();
/// let profile = profiler.last_profile().unwrap();
/// assert_eq!(profile.sql, "SELECT 1");
/// assert!(profile.elapsed.is_some());
/// ```
#[derive(Default)]
pub struct QueryProfiler {
    state: Mutex<ProfilerState>,
}

impl QueryProfiler {
    pub fn new() -> Self {
        Default::default()
    }

    fn state(&self) -> MutexGuard<'_, ProfilerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.state().profiles.clone()
    }

    pub fn last_profile(&self) -> Option<Profile> {
        self.state().profiles.last().cloned()
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.profiles.clear();
        state.current = None;
    }
}

impl Profiler for QueryProfiler {
    fn profiler_start(&self, target: &dyn StatementContainer) {
        let mut state = self.state();
        state.profiles.push(Profile {
            sql: target.sql().to_string(),
            parameters: target.parameter_container().cloned(),
            start: Instant::now(),
            end: None,
            elapsed: None,
        });
        let current = state.profiles.len() - 1;
        state.current = Some(current);
    }

    fn profiler_finish(&self) {
        let mut state = self.state();
        let Some(current) = state.current.take() else {
            log::warn!("The profiler was finished without being started");
            return;
        };
        let end = Instant::now();
        let profile = &mut state.profiles[current];
        profile.end = Some(end);
        profile.elapsed = Some(end - profile.start);
        log::debug!("{}", profile);
    }
}
