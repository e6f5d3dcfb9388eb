use crate::execute;
use slate::{
    AsValue, ParameterContainer, ParameterKey, ParameterType, Result, ResultSet, RowLabeled,
    Statement, Value,
};

pub async fn parameters<S, F>(create: &mut F)
where
    S: Statement,
    S::Result: IntoIterator<Item = RowLabeled>,
    F: AsyncFnMut(String) -> Result<S>,
{
    execute(create, "DROP TABLE IF EXISTS slate_parameters", None)
        .await
        .expect("Failed to drop slate_parameters");
    execute(
        create,
        "CREATE TABLE slate_parameters (id INTEGER, label TEXT)",
        None,
    )
    .await
    .expect("Failed to create slate_parameters");

    // Named parameters are bound in the order they were first set
    let mut container = ParameterContainer::new();
    container
        .offset_set(":id", 1)
        .offset_set_with("label", "one", ParameterType::String, Some(16));
    let mut insert = create("INSERT INTO slate_parameters VALUES ($#, $#)".into())
        .await
        .expect("Failed to create the insert statement");
    insert.set_parameter_container(container);
    insert
        .execute(None)
        .await
        .expect("Failed to insert with the attached container");

    // Raw values overwrite the attached container
    insert
        .execute(Some(vec![Value::Int32(Some(2)), "two".as_value()].into()))
        .await
        .expect("Failed to insert with raw values");
    let container = insert
        .parameter_container()
        .expect("The container should stay attached");
    assert_eq!(container.offset_get("id"), Some(&Value::Int32(Some(2))));
    assert_eq!(
        container.offset_get_errata("label"),
        Some(ParameterType::String)
    );
    assert_eq!(container.offset_get_max_length(1usize), Some(16));

    // Named pairs
    insert
        .execute(Some(
            vec![("id", Value::Int32(Some(3))), ("label", "three".as_value())].into(),
        ))
        .await
        .expect("Failed to insert with named values");

    // Container appended to
    let mut container = ParameterContainer::new();
    container
        .offset_set(ParameterKey::Next, 4)
        .offset_set(ParameterKey::Next, "four");
    let result = execute(
        create,
        "INSERT INTO slate_parameters VALUES ($#, $#)",
        Some(container.into()),
    )
    .await
    .expect("Failed to insert with a passed container");
    assert_eq!(result.affected_rows(), 1);

    let result = execute(
        create,
        "SELECT id, label FROM slate_parameters ORDER BY id",
        None,
    )
    .await
    .expect("Failed to query slate_parameters");
    let rows = result
        .into_iter()
        .map(|row| row.values().to_vec())
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        [1, 2, 3, 4]
            .into_iter()
            .zip(["one", "two", "three", "four"])
            .map(|(id, label)| vec![Value::Int32(Some(id)), label.as_value()])
            .collect::<Vec<_>>()
    );

    // Removing a parameter shifts the following ones back
    let mut container = ParameterContainer::new();
    container
        .offset_set("skip", 0)
        .offset_set("id", 3)
        .offset_set("label", "ignored");
    container.offset_unset("skip").offset_unset(1usize);
    let mut select = create("SELECT label FROM slate_parameters WHERE id = $#".into())
        .await
        .expect("Failed to create the select statement");
    select.set_parameter_container(container);
    let result = select.execute(None).await.expect("Failed to select by id");
    assert_eq!(select.sql(), "SELECT label FROM slate_parameters WHERE id = $1");
    let rows = result.into_iter().collect::<Vec<_>>();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values(), ["three".as_value()]);
}
