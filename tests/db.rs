mod common;

#[test]
fn test_creates_and_migrates_db_file() {
    let test_db = common::TestDb::new("test_creates_and_migrates_db_file.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
    assert!(test_db.path().exists());
}

#[test]
fn test_foreign_keys_are_enforced() {
    use diesel::RunQueryDsl;
    use diesel::sql_query;

    let test_db = common::TestDb::new("test_foreign_keys_are_enforced.db");
    let mut conn = test_db.pool().get().expect("connection");

    let result = sql_query(
        "INSERT INTO quote_requests (user_id, service_type, pickup_location, delivery_location, status) \
         VALUES (999, 'Shipping Services', 'A', 'B', 'pending')",
    )
    .execute(&mut conn);

    assert!(result.is_err());
}
