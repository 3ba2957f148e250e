use super::test_util::TestDatabase;
use crate::domain::todo::driving_ports::{TodoError, TodoPort};
use crate::domain::todo::{NewTodo, TodoService, TodoUpdate};
use crate::persistence::db_todo_driven_ports::DbTodoPersistence;
use crate::persistence::http_page_driven_ports::HttpTodoListSource;
use crate::persistence::{ExternalConnectivity, TodoStore};
use crate::{SharedData, routes};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use speculoos::prelude::*;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn todo_crud_against_postgres() {
    let test_db = TestDatabase::create().await;
    let mut ext_cxn =
        ExternalConnectivity::new(Some(test_db.pool.clone())).expect("could not build connectivity");
    let service = TodoService {};
    let store = DbTodoPersistence;

    let older = service
        .create(
            &NewTodo {
                text: "Buy milk".to_owned(),
            },
            &mut ext_cxn,
            &store,
        )
        .await
        .expect("could not create first todo");
    let newer = service
        .create(
            &NewTodo {
                text: "  Walk the dog ".to_owned(),
            },
            &mut ext_cxn,
            &store,
        )
        .await
        .expect("could not create second todo");
    assert_eq!("Walk the dog", newer.text);

    let listed = service.list(&mut ext_cxn, &store).await;
    assert_that!(listed).is_ok_containing(vec![newer.clone(), older.clone()]);

    let updated = service
        .update(
            older.uid,
            TodoUpdate {
                text: None,
                done: Some(true),
            },
            &mut ext_cxn,
            &store,
        )
        .await;
    assert_that!(updated).is_ok().matches(|todo| {
        todo.done && todo.text == older.text && todo.created_at == older.created_at
    });

    let missing_update = service
        .update(Uuid::new_v4(), TodoUpdate::default(), &mut ext_cxn, &store)
        .await;
    let Err(TodoError::NotFound) = missing_update else {
        panic!("Expected not found, got {missing_update:#?}");
    };

    assert_that!(service.delete(older.uid, &mut ext_cxn, &store).await).is_ok_containing(true);
    assert_that!(service.delete(older.uid, &mut ext_cxn, &store).await).is_ok_containing(false);

    let listed = service.list(&mut ext_cxn, &store).await;
    assert_that!(listed).is_ok_containing(vec![newer]);

    test_db.drop_db().await;
}

#[tokio::test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
async fn create_over_http_against_postgres() {
    let test_db = TestDatabase::create().await;
    let shared_data = SharedData {
        ext_cxn: ExternalConnectivity::new(Some(test_db.pool.clone()))
            .expect("could not build connectivity"),
        todo_store: TodoStore::Postgres(DbTodoPersistence),
        page_source: HttpTodoListSource::new("http://127.0.0.1:9"),
    };
    let router = routes::build_router(Arc::new(shared_data));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/todos.json")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("text=Evan%27s+task"))
        .expect("invalid request");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router failed to respond");
    assert_eq!(StatusCode::CREATED, response.status());

    let stored_texts: Vec<String> = sqlx::query_scalar("SELECT text FROM todo")
        .fetch_all(&test_db.pool)
        .await
        .expect("could not read back todos");
    assert_eq!(vec!["Evan's task".to_owned()], stored_texts);

    test_db.drop_db().await;
}
