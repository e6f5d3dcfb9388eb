use crate::{execute, silent_logs};
use slate::{AsValue, Result, RowLabeled, Statement, StatementError, Value};

fn kind(error: &slate::Error) -> Option<&StatementError> {
    error.downcast_ref::<StatementError>()
}

pub async fn errors<S, F>(create: &mut F)
where
    S: Statement,
    S::Result: IntoIterator<Item = RowLabeled>,
    F: AsyncFnMut(String) -> Result<S>,
{
    execute(create, "DROP TABLE IF EXISTS slate_errors", None)
        .await
        .expect("Failed to drop slate_errors");
    execute(
        create,
        "CREATE TABLE slate_errors (id INTEGER PRIMARY KEY)",
        None,
    )
    .await
    .expect("Failed to create slate_errors");

    // Syntax errors are reported when preparing
    let mut statement = create("SELEC 1".into())
        .await
        .expect("Failed to create the statement");
    let error = silent_logs! {
        statement.prepare(None).await.expect_err("Preparing invalid sql should fail")
    };
    let Some(StatementError::QueryPreparation(message)) = kind(&error) else {
        panic!("Unexpected error: {:#}", error);
    };
    assert!(message.contains("syntax error"), "{}", message);
    assert!(!statement.is_prepared());
    let error = silent_logs! {
        statement.execute(None).await.err().expect("Executing invalid sql should fail")
    };
    assert!(matches!(
        kind(&error),
        Some(StatementError::QueryPreparation(..))
    ));

    // Constraint violations are reported when executing
    let mut insert = create("INSERT INTO slate_errors VALUES ($#)".into())
        .await
        .expect("Failed to create the insert statement");
    insert
        .execute(Some(vec![Value::Int32(Some(1))].into()))
        .await
        .expect("Failed to insert into slate_errors");
    let error = silent_logs! {
        insert
            .execute(Some(vec![Value::Int32(Some(1))].into()))
            .await
            .err()
            .expect("Inserting a duplicate key should fail")
    };
    let Some(StatementError::QueryExecution(message)) = kind(&error) else {
        panic!("Unexpected error: {:#}", error);
    };
    assert!(message.contains("duplicate key"), "{}", message);
    assert!(format!("{:#}", error).contains("While executing the statement `statement"));

    // The statement is still usable
    insert
        .execute(Some(vec![Value::Int32(Some(2))].into()))
        .await
        .expect("Failed to insert after a failure");

    // Wrong number of parameters
    let error = silent_logs! {
        insert
            .execute(Some(vec![Value::Int32(Some(3)), Value::Int32(Some(4))].into()))
            .await
            .err()
            .expect("Binding too many parameters should fail")
    };
    let Some(StatementError::QueryExecution(message)) = kind(&error) else {
        panic!("Unexpected error: {:#}", error);
    };
    assert!(message.contains("bind message supplies 2 parameters"), "{}", message);

    // Values that cannot be converted to the declared type
    let mut insert = create("INSERT INTO slate_errors VALUES ($#)".into())
        .await
        .expect("Failed to create the insert statement");
    let error = silent_logs! {
        insert
            .execute(Some(vec!["not a number".as_value()].into()))
            .await
            .err()
            .expect("Binding text to an integer should fail")
    };
    assert!(matches!(
        kind(&error),
        Some(StatementError::QueryExecution(..))
    ));
}
