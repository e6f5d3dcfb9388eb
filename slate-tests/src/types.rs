use crate::execute;
use indoc::indoc;
use rust_decimal::Decimal;
use slate::{AsValue, Result, ResultSet, RowLabeled, Statement, Value};
use std::str::FromStr;
use time::macros::{date, datetime, time};
use uuid::Uuid;

pub async fn types<S, F>(create: &mut F)
where
    S: Statement,
    S::Result: IntoIterator<Item = RowLabeled>,
    F: AsyncFnMut(String) -> Result<S>,
{
    execute(create, "DROP TABLE IF EXISTS slate_types", None)
        .await
        .expect("Failed to drop slate_types");
    execute(
        create,
        indoc! {"
            CREATE TABLE slate_types (
                small SMALLINT,
                big BIGINT,
                ratio REAL,
                amount NUMERIC(12, 2),
                data BYTEA,
                day DATE,
                moment TIME,
                created TIMESTAMP,
                updated TIMESTAMPTZ,
                code UUID
            )
        "},
        None,
    )
    .await
    .expect("Failed to create slate_types");

    let uuid = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").expect("Invalid uuid");
    let amount = Decimal::from_str("1234.50").expect("Invalid decimal");
    let result = execute(
        create,
        "INSERT INTO slate_types VALUES ($#, $#, $#, $#, $#, $#, $#, $#, $#, $#)",
        Some(
            vec![
                // Integers are widened or narrowed to the declared type
                Value::Int32(Some(-12)),
                Value::Int32(Some(77)),
                0.25f32.as_value(),
                amount.as_value(),
                vec![1u8, 2, 3, 255].as_value(),
                date!(2024 - 02 - 29).as_value(),
                time!(23:59:01).as_value(),
                datetime!(2001-09-11 08:46:00).as_value(),
                datetime!(2020-01-01 10:00:00 +02:00).as_value(),
                // Text is parsed into a uuid
                uuid.to_string().as_value(),
            ]
            .into(),
        ),
    )
    .await
    .expect("Failed to insert into slate_types");
    assert_eq!(result.affected_rows(), 1);

    let result = execute(create, "SELECT * FROM slate_types", None)
        .await
        .expect("Failed to query slate_types");
    let row = result
        .into_iter()
        .next()
        .expect("slate_types should have one row");
    assert_eq!(row.get_column("small"), Some(&Value::Int16(Some(-12))));
    assert_eq!(row.get_column("big"), Some(&Value::Int64(Some(77))));
    assert_eq!(row.get_column("ratio"), Some(&Value::Float32(Some(0.25))));
    assert_eq!(row.get_column("amount"), Some(&Value::Decimal(Some(amount))));
    assert_eq!(
        row.get_column("data"),
        Some(&Value::Blob(Some([1, 2, 3, 255].into())))
    );
    assert_eq!(
        row.get_column("day"),
        Some(&Value::Date(Some(date!(2024 - 02 - 29))))
    );
    assert_eq!(
        row.get_column("moment"),
        Some(&Value::Time(Some(time!(23:59:01))))
    );
    assert_eq!(
        row.get_column("created"),
        Some(&Value::Timestamp(Some(datetime!(2001-09-11 08:46:00))))
    );
    assert_eq!(
        row.get_column("updated"),
        Some(&Value::TimestampWithTimezone(Some(
            datetime!(2020-01-01 08:00:00 UTC)
        )))
    );
    assert_eq!(row.get_column("code"), Some(&Value::Uuid(Some(uuid))));

    // Nulls keep the type of the column
    execute(create, "DELETE FROM slate_types", None)
        .await
        .expect("Failed to clear slate_types");
    execute(
        create,
        "INSERT INTO slate_types (small, code) VALUES ($#, $#)",
        Some(vec![Value::Null, Value::Uuid(None)].into()),
    )
    .await
    .expect("Failed to insert nulls into slate_types");
    let result = execute(create, "SELECT small, code FROM slate_types", None)
        .await
        .expect("Failed to query slate_types");
    let row = result
        .into_iter()
        .next()
        .expect("slate_types should have one row");
    assert_eq!(row.values(), [Value::Int16(None), Value::Uuid(None)]);
}
