use crate::silent_logs;
use slate::{AsValue, ProfilerAware, QueryProfiler, Result, RowLabeled, Statement};
use std::sync::Arc;

pub async fn profiler<S, F>(create: &mut F)
where
    S: Statement + ProfilerAware,
    S::Result: IntoIterator<Item = RowLabeled>,
    F: AsyncFnMut(String) -> Result<S>,
{
    let profiler = Arc::new(QueryProfiler::new());
    let mut statement = create("SELECT $#::INTEGER + $#::INTEGER".into())
        .await
        .expect("Failed to create the statement");
    statement.set_profiler(profiler.clone());
    for i in 0..3i32 {
        statement
            .execute(Some(vec![i.as_value(), 1i32.as_value()].into()))
            .await
            .expect("Failed to execute the profiled statement");
    }
    let profiles = profiler.profiles();
    assert_eq!(profiles.len(), 3);
    for (i, profile) in profiles.iter().enumerate() {
        assert_eq!(profile.sql, "SELECT $1::INTEGER + $2::INTEGER");
        assert!(profile.elapsed.is_some());
        let parameters = profile
            .parameters
            .as_ref()
            .expect("The profile should record the parameters");
        assert_eq!(parameters.positional_array()[0], (i as i32).as_value());
    }

    // Failed executions are profiled too
    profiler.clear();
    let _ = silent_logs! {
        statement.execute(Some(vec!["x".as_value()].into())).await
    };
    let profile = profiler.last_profile().expect("The failure should be profiled");
    assert!(profile.end.is_some());
}
