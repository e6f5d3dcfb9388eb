#[cfg(test)]
mod tests {
    use slate_core::{
        AsValue, Driver, NativeConnection, ParameterContainer, PrepareType, ProfilerAware,
        QueryProfiler, Result, RowLabeled, RowNames, SharedConnection, Statement,
        StatementContainer, StatementError, Value,
    };
    use slate_postgres::{PostgresDriver, PostgresResult, PostgresStatement};
    use slate_tests::{init_logs, silent_logs};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Prepare(String, String),
        Execute(String, Vec<Value>),
    }

    #[derive(Default)]
    struct MockConnection {
        calls: Vec<Call>,
        fail_prepare: bool,
        fail_execute: bool,
        closed: bool,
        last_error: Option<String>,
    }

    impl NativeConnection for MockConnection {
        type Handle = String;
        type NativeResult = Vec<Value>;

        async fn prepare_named(&mut self, name: &str, sql: &str) -> Option<String> {
            self.calls.push(Call::Prepare(name.into(), sql.into()));
            if self.fail_prepare {
                self.last_error = Some("ERROR:  syntax error at or near \"SELEC\"".into());
                return None;
            }
            Some(name.into())
        }

        async fn execute_named(
            &mut self,
            name: &str,
            parameters: Vec<Value>,
        ) -> Option<Vec<Value>> {
            self.calls.push(Call::Execute(name.into(), parameters.clone()));
            if self.fail_execute {
                self.last_error = Some("ERROR:  division by zero".into());
                return None;
            }
            Some(parameters)
        }

        fn last_error(&self) -> Option<String> {
            self.last_error.clone()
        }

        fn is_closed(&self) -> bool {
            self.closed
        }
    }

    #[derive(Default)]
    struct MockDriver {
        results: Arc<AtomicUsize>,
    }

    impl Driver for MockDriver {
        type Connection = MockConnection;
        type Result = PostgresResult;

        const NAME: &'static str = "mock";

        fn create_result(&self, native: Vec<Value>) -> Result<PostgresResult> {
            self.results.fetch_add(1, Ordering::Relaxed);
            let labels: RowNames = (0..native.len()).map(|i| format!("p{}", i)).collect();
            Ok(PostgresResult::new(
                labels.clone(),
                vec![RowLabeled::new(labels, native.into())],
                1,
            ))
        }

        fn format_parameter_name(&self, _name: &str) -> String {
            "$#".into()
        }
    }

    fn statement(connection: &SharedConnection<MockConnection>) -> PostgresStatement<MockDriver> {
        let mut statement = PostgresStatement::new(MockDriver::default());
        statement.set_connection(connection.clone());
        statement
    }

    fn statement_error(error: &slate_core::Error) -> Option<&StatementError> {
        error.downcast_ref::<StatementError>()
    }

    fn name_index(name: &str) -> u64 {
        name.strip_prefix("statement")
            .expect("Statement names start with `statement`")
            .parse()
            .expect("Statement names end with a number")
    }

    #[tokio::test]
    async fn prepare_numbers_placeholders() {
        init_logs();
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELECT * FROM users WHERE id = $# AND active = $#");
        statement.prepare(None).await.expect("Could not prepare");
        assert!(statement.is_prepared());
        assert_eq!(
            statement.sql(),
            "SELECT * FROM users WHERE id = $1 AND active = $2"
        );
        assert_eq!(statement.resource(), Some(&statement.statement_name().to_string()));
        assert_eq!(
            connection.lock().await.calls,
            [Call::Prepare(
                statement.statement_name().into(),
                "SELECT * FROM users WHERE id = $1 AND active = $2".into()
            )]
        );
    }

    #[tokio::test]
    async fn prepare_with_explicit_sql() {
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELECT 1");
        statement
            .prepare(Some("DELETE FROM t WHERE a = $# OR a = $# OR a = $#"))
            .await
            .expect("Could not prepare");
        assert_eq!(statement.sql(), "DELETE FROM t WHERE a = $1 OR a = $2 OR a = $3");

        // Empty sql falls back to the current one
        statement.set_sql("SELECT 2");
        statement.prepare(Some("")).await.expect("Could not prepare");
        assert_eq!(statement.sql(), "SELECT 2");
    }

    #[tokio::test]
    async fn statement_names_increase() {
        let connection = MockConnection::default().shared();
        let mut first = statement(&connection);
        let mut second = statement(&connection);
        assert_eq!(first.statement_name(), "");
        first.set_sql("SELECT 1").prepare(None).await.expect("Could not prepare");
        second.set_sql("SELECT 1").prepare(None).await.expect("Could not prepare");
        let a = first.statement_name().to_string();
        let b = second.statement_name().to_string();
        assert_ne!(a, b);
        assert!(name_index(&a) < name_index(&b));

        // Preparing again allocates a new name
        first.prepare(None).await.expect("Could not prepare");
        assert!(name_index(first.statement_name()) > name_index(&b));
        let connection = connection.lock().await;
        let calls = &connection.calls;
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn execute_prepares_once() {
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELECT $#");
        assert!(!statement.is_prepared());
        let result = statement
            .execute(Some(vec![5i32.as_value()].into()))
            .await
            .expect("Could not execute");
        assert!(statement.is_prepared());
        assert_eq!(result.rows()[0].values(), [Value::Int32(Some(5))]);
        statement
            .execute(Some(vec![6i32.as_value()].into()))
            .await
            .expect("Could not execute");
        let name = statement.statement_name().to_string();
        assert_eq!(
            connection.lock().await.calls,
            [
                Call::Prepare(name.clone(), "SELECT $1".into()),
                Call::Execute(name.clone(), vec![Value::Int32(Some(5))]),
                Call::Execute(name, vec![Value::Int32(Some(6))]),
            ]
        );
        assert_eq!(statement.driver().results.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn raw_and_container_parameters_bind_the_same() {
        let connection = MockConnection::default().shared();
        let values = vec![1i32.as_value(), "x".as_value()];

        let mut raw = statement(&connection);
        raw.set_sql("INSERT INTO t VALUES ($#, $#)");
        raw.execute(Some(values.clone().into()))
            .await
            .expect("Could not execute with raw values");

        let mut attached = statement(&connection);
        attached
            .set_sql("INSERT INTO t VALUES ($#, $#)")
            .set_parameter_container(values.clone().into());
        attached
            .execute(None)
            .await
            .expect("Could not execute with a container");

        let bound = connection
            .lock()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Execute(_, values) => Some(values.clone()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(bound, [values.clone(), values]);
        assert_eq!(
            raw.parameter_container().map(ParameterContainer::positional_array),
            attached.parameter_container().map(ParameterContainer::positional_array),
        );
    }

    #[tokio::test]
    async fn raw_values_are_loaded_into_the_container() {
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        let container: ParameterContainer = [("a", 1), ("b", 2)].into_iter().collect();
        statement
            .set_sql("SELECT $#, $#")
            .set_parameter_container(container);
        let result = statement
            .execute(Some(vec![9i32.as_value()].into()))
            .await
            .expect("Could not execute");
        assert_eq!(
            result.rows()[0].values(),
            [Value::Int32(Some(9)), Value::Int32(Some(2))]
        );
        let container = statement
            .parameter_container()
            .expect("The container should be attached");
        assert_eq!(container.offset_get("a"), Some(&Value::Int32(Some(9))));
        assert_eq!(container.count(), 2);
    }

    #[tokio::test]
    async fn named_values_follow_the_given_order() {
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELECT $#, $#");
        let result = statement
            .execute(Some(
                vec![("name", "Bob".as_value()), ("age", 42i32.as_value())].into(),
            ))
            .await
            .expect("Could not execute");
        assert_eq!(
            result.rows()[0].values(),
            [Value::Varchar(Some("Bob".into())), Value::Int32(Some(42))]
        );
        let container = statement
            .parameter_container()
            .expect("The container should be attached");
        assert_eq!(container.key_position("age"), Some(1));
    }

    #[tokio::test]
    async fn passed_container_is_adopted() {
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELECT $#");
        let mut container = ParameterContainer::new();
        container.offset_set(":id", 3);
        statement
            .execute(Some(container.clone().into()))
            .await
            .expect("Could not execute");
        assert_eq!(statement.parameter_container(), Some(&container));
        let connection = connection.lock().await;
        let calls = &connection.calls;
        assert_eq!(
            calls.last(),
            Some(&Call::Execute(
                statement.statement_name().into(),
                vec![Value::Int32(Some(3))]
            ))
        );
    }

    #[tokio::test]
    async fn attached_container_wins_over_passed_one() {
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        let attached: ParameterContainer = [("id", 1)].into_iter().collect();
        let passed: ParameterContainer = [("other", 2)].into_iter().collect();
        statement
            .set_sql("SELECT $#")
            .set_parameter_container(attached.clone());
        let result = statement
            .execute(Some(passed.into()))
            .await
            .expect("Could not execute");
        assert_eq!(result.rows()[0].values(), [Value::Int32(Some(1))]);
        assert_eq!(statement.parameter_container(), Some(&attached));

        // An empty attached container lets the passed values through
        statement.set_parameter_container(ParameterContainer::new());
        let passed: ParameterContainer = [("other", 2)].into_iter().collect();
        let result = statement
            .execute(Some(passed.into()))
            .await
            .expect("Could not execute");
        assert_eq!(result.rows()[0].values(), [Value::Int32(Some(2))]);
    }

    #[tokio::test]
    async fn changing_sql_prepares_again() {
        let connection = MockConnection::default().shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELECT $#");
        statement.prepare(None).await.expect("Could not prepare");
        let first = statement.statement_name().to_string();

        // Same text keeps the prepared statement
        statement.set_sql("SELECT $1");
        assert!(statement.is_prepared());

        statement.set_sql("DELETE FROM t WHERE a = $#");
        assert!(!statement.is_prepared());
        statement
            .execute(Some(vec![1i32.as_value()].into()))
            .await
            .expect("Could not execute");
        let second = statement.statement_name().to_string();
        assert!(name_index(&second) > name_index(&first));
        assert_eq!(statement.sql(), "DELETE FROM t WHERE a = $1");
        assert_eq!(
            connection.lock().await.calls,
            [
                Call::Prepare(first, "SELECT $1".into()),
                Call::Prepare(second.clone(), "DELETE FROM t WHERE a = $1".into()),
                Call::Execute(second, vec![Value::Int32(Some(1))]),
            ]
        );
    }

    #[tokio::test]
    async fn execution_failure() {
        let connection = MockConnection {
            fail_execute: true,
            ..Default::default()
        }
        .shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELECT 1 / $#");
        let error = silent_logs! {
            statement
                .execute(Some(vec![0i32.as_value()].into()))
                .await
                .expect_err("Execution should fail")
        };
        assert_eq!(
            statement_error(&error),
            Some(&StatementError::QueryExecution(
                "ERROR:  division by zero".into()
            ))
        );
        assert!(format!("{:#}", error).contains(&format!(
            "While executing the statement `{}`",
            statement.statement_name()
        )));
        assert_eq!(statement.driver().results.load(Ordering::Relaxed), 0);
        // Still prepared, a later execution can succeed
        assert!(statement.is_prepared());
        connection.lock().await.fail_execute = false;
        statement
            .execute(Some(vec![1i32.as_value()].into()))
            .await
            .expect("Could not execute");
        assert_eq!(statement.driver().results.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn preparation_failure() {
        let connection = MockConnection {
            fail_prepare: true,
            ..Default::default()
        }
        .shared();
        let mut statement = statement(&connection);
        statement.set_sql("SELEC 1");
        let error = silent_logs! {
            statement.prepare(None).await.expect_err("Preparation should fail")
        };
        assert!(matches!(
            statement_error(&error),
            Some(StatementError::QueryPreparation(message)) if message.contains("syntax error")
        ));
        assert!(!statement.is_prepared());
        assert_eq!(statement.resource(), None);

        let error = silent_logs! {
            statement.execute(None).await.expect_err("Execution should fail")
        };
        assert!(matches!(
            statement_error(&error),
            Some(StatementError::QueryPreparation(..))
        ));
        assert!(
            !connection
                .lock()
                .await
                .calls
                .iter()
                .any(|call| matches!(call, Call::Execute(..)))
        );
    }

    #[tokio::test]
    async fn missing_connection() {
        let mut statement = PostgresStatement::new(MockDriver::default());
        statement.set_sql("SELECT 1");
        let (prepared, executed) = silent_logs! {
            (statement.prepare(None).await, statement.execute(None).await.map(|_| ()))
        };
        for error in [
            prepared.expect_err("Prepare should fail"),
            executed.expect_err("Execute should fail"),
        ] {
            assert!(matches!(
                statement_error(&error),
                Some(StatementError::Configuration(..))
            ));
        }
    }

    #[tokio::test]
    async fn closed_connection() {
        let connection = MockConnection {
            closed: true,
            ..Default::default()
        }
        .shared();
        let mut statement = PostgresStatement::new(MockDriver::default());
        let result = silent_logs! {
            statement.initialize(connection).await.map(|_| ())
        };
        let error = result.expect_err("A closed connection should be refused");
        assert!(matches!(
            statement_error(&error),
            Some(StatementError::Configuration(..))
        ));
        assert!(statement.connection().is_none());
    }

    #[tokio::test]
    async fn profiler_sees_every_execution() {
        let connection = MockConnection::default().shared();
        let profiler = Arc::new(QueryProfiler::new());
        let mut statement = statement(&connection);
        statement
            .set_profiler(profiler.clone())
            .set_sql("UPDATE t SET a = $# WHERE b = $#");
        statement
            .execute(Some(vec![true.as_value(), 10i32.as_value()].into()))
            .await
            .expect("Could not execute");
        let profiles = profiler.profiles();
        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.sql, "UPDATE t SET a = $1 WHERE b = $2");
        assert!(profile.elapsed.is_some());
        assert_eq!(
            profile
                .parameters
                .as_ref()
                .map(ParameterContainer::positional_array),
            Some(vec![Value::Boolean(Some(true)), Value::Int32(Some(10))])
        );

        connection.lock().await.fail_execute = true;
        silent_logs! {
            let _ = statement.execute(None).await;
        }
        let profiles = profiler.profiles();
        assert_eq!(profiles.len(), 2);
        assert!(profiles[1].elapsed.is_some());
    }

    #[tokio::test]
    async fn shared_connection() {
        let connection = MockConnection::default().shared();
        let mut statements = (0..4)
            .map(|_| {
                let mut statement = statement(&connection);
                statement.set_sql("SELECT $#");
                statement
            })
            .collect::<Vec<_>>();
        let tasks = statements
            .iter_mut()
            .enumerate()
            .map(|(i, s)| s.execute(Some(vec![(i as i32).as_value()].into())));
        for result in futures::future::join_all(tasks).await {
            result.expect("Could not execute");
        }
        let connection = connection.lock().await;
        let calls = &connection.calls;
        assert_eq!(calls.len(), 8);
        for statement in &statements {
            assert!(calls.contains(&Call::Prepare(
                statement.statement_name().into(),
                "SELECT $1".into()
            )));
        }
    }

    #[test]
    fn postgres_driver() {
        let driver = PostgresDriver::new();
        assert_eq!(PostgresDriver::NAME, "postgres");
        assert_eq!(driver.prepare_type(), PrepareType::Positional);
        assert_eq!(driver.format_parameter_name("id"), "$#");
        assert!(driver.profiler().is_none());
    }

    #[test]
    fn display() {
        let mut statement = PostgresStatement::new(MockDriver::default());
        statement.set_sql("SELECT 1");
        assert_eq!(statement.to_string(), "SELECT 1\n");
    }
}
