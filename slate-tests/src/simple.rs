use crate::execute;
use indoc::indoc;
use slate::{AsValue, Result, ResultSet, RowLabeled, Statement, Value};
use std::sync::LazyLock;
use tokio::sync::Mutex;

pub async fn simple<S, F>(create: &mut F)
where
    S: Statement,
    S::Result: IntoIterator<Item = RowLabeled>,
    F: AsyncFnMut(String) -> Result<S>,
{
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    let _lock = MUTEX.lock().await;

    // Setup
    execute(create, "DROP TABLE IF EXISTS slate_simple", None)
        .await
        .expect("Failed to drop slate_simple");
    let result = execute(
        create,
        indoc! {"
            CREATE TABLE slate_simple (
                id INTEGER PRIMARY KEY,
                name VARCHAR(64),
                score DOUBLE PRECISION,
                active BOOLEAN NOT NULL
            )
        "},
        None,
    )
    .await
    .expect("Failed to create slate_simple");
    assert!(!result.is_query_result());

    // Insert, the same statement executed many times
    let mut insert = create("INSERT INTO slate_simple VALUES ($#, $#, $#, $#)".into())
        .await
        .expect("Failed to create the insert statement");
    insert.prepare(None).await.expect("Failed to prepare the insert");
    assert_eq!(
        insert.sql(),
        "INSERT INTO slate_simple VALUES ($1, $2, $3, $4)"
    );
    let rows = [
        (1i32, "alpha".as_value(), 1.5f64.as_value(), true),
        (2, "bravo".as_value(), Value::Null, false),
        (3, Value::Null, 7i32.as_value(), true),
    ];
    for (id, name, score, active) in rows {
        let result = insert
            .execute(Some(
                vec![id.as_value(), name, score, active.as_value()].into(),
            ))
            .await
            .expect("Failed to insert into slate_simple");
        assert_eq!(result.affected_rows(), 1);
        assert_eq!(result.count(), 0);
    }

    // Select
    let result = execute(
        create,
        "SELECT id, name, score, active FROM slate_simple WHERE id >= $# ORDER BY id",
        Some(vec![2i32.as_value()].into()),
    )
    .await
    .expect("Failed to query slate_simple");
    assert!(result.is_query_result());
    assert_eq!(result.field_count(), 4);
    assert_eq!(result.count(), 2);
    let rows = result.into_iter().collect::<Vec<_>>();
    assert_eq!(rows[0].names(), ["id", "name", "score", "active"]);
    assert_eq!(
        rows[0].values(),
        [
            Value::Int32(Some(2)),
            Value::Varchar(Some("bravo".into())),
            Value::Float64(None),
            Value::Boolean(Some(false)),
        ]
    );
    assert_eq!(rows[1].get_column("name"), Some(&Value::Varchar(None)));
    assert_eq!(rows[1].get_column("score"), Some(&Value::Float64(Some(7.0))));

    // Update
    let result = execute(
        create,
        "UPDATE slate_simple SET active = $# WHERE active = $#",
        Some(vec![false.as_value(), true.as_value()].into()),
    )
    .await
    .expect("Failed to update slate_simple");
    assert_eq!(result.affected_rows(), 2);

    // Empty result
    let result = execute(
        create,
        "SELECT id FROM slate_simple WHERE active = $#",
        Some(vec![true.as_value()].into()),
    )
    .await
    .expect("Failed to query slate_simple");
    assert!(result.is_query_result());
    assert_eq!(result.count(), 0);
    assert_eq!(result.field_count(), 1);
}
