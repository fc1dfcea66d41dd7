mod common;

use std::sync::{Arc, Mutex};

use common::{books, Recorder};
use crud_bindings::clients::{HttpResponse, Method};
use crud_bindings::framework::mock::{MockHttpClient, TestStore};
use crud_bindings::framework::{mappers, CrudError, CrudVerb, Payload, RequestDescriptor, RequestError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_commits_new_item() {
    let http = MockHttpClient::new();
    http.expect_post("/books").return_ok(json!({ "id": 7, "title": "X" }));

    let module = books(&http)
        .with_commit_state(true)
        .with_update_state_after_action(true)
        .with_refresh_after_action(false)
        .get_module();
    let store = TestStore::new(module);

    let result = store.dispatch("createBook", json!({ "title": "X" })).await.unwrap();

    assert_eq!(result, Some(json!({ "id": 7, "title": "X" })));
    assert_eq!(store.get("books"), json!([{ "id": 7, "title": "X" }]));
    assert_eq!(store.get("creatingBook"), json!(false));
    assert_eq!(
        http.requests()[0].data,
        Some(json!({ "title": "X" })),
        "create sends the action data as body"
    );
    assert_eq!(
        store.commits(),
        vec!["SET_CREATING_BOOK", "ADD_BOOK", "SET_CREATING_BOOK"]
    );
    http.verify();
}

#[tokio::test]
async fn test_fetch_failure_goes_to_error_handler() {
    let http = MockHttpClient::new();
    http.expect_get("/books")
        .return_err(RequestError::Transport("connection refused".into()));

    let errors = Recorder::default();
    let module = books(&http)
        .with_update_state_after_action(true)
        .on_action_error(errors.swallowing())
        .get_module();
    let store = TestStore::new(module);

    let result = store.dispatch("fetchBooks", Value::Null).await.unwrap();

    assert_eq!(result, None);
    assert_eq!(
        errors.calls(),
        vec![(
            "fetchItems".to_string(),
            "transport error: connection refused".to_string(),
            "books".to_string()
        )]
    );
    assert_eq!(store.get("fetchingBooks"), json!(false));
    assert_eq!(store.get("books"), Value::Null);
}

#[tokio::test]
async fn test_default_error_handler_reraises() {
    let http = MockHttpClient::new();
    http.expect_get("/books/3").return_status(404, json!({ "error": "not found" }));

    let store = TestStore::new(books(&http).get_module());
    let err = store.dispatch("getBook", json!(3)).await.unwrap_err();

    assert_eq!(
        err,
        CrudError::Request(RequestError::Status {
            status: 404,
            body: json!({ "error": "not found" }),
        })
    );
    assert_eq!(store.get("gettingBook"), json!(false));
    assert_eq!(store.get("currentBook"), Value::Null);
}

#[tokio::test]
async fn test_loading_flag_is_raised_during_the_call() {
    let http = MockHttpClient::new();
    let store = TestStore::new(books(&http).get_module());
    let seen = Arc::new(Mutex::new(Vec::new()));

    for fail in [false, true] {
        let observer = store.clone();
        let seen = seen.clone();
        http.expect_get("/books").return_with(move |_| {
            seen.lock().unwrap().push(observer.get("fetchingBooks"));
            if fail {
                Err(RequestError::Transport("reset".into()))
            } else {
                Ok(HttpResponse::ok(json!([])))
            }
        });

        let result = store.dispatch("fetchBooks", Value::Null).await;
        assert_eq!(result.is_err(), fail);
        assert_eq!(store.get("fetchingBooks"), json!(false));
    }

    assert_eq!(*seen.lock().unwrap(), vec![json!(true), json!(true)]);
}

#[tokio::test]
async fn test_get_sets_current_item() {
    let http = MockHttpClient::new();
    http.expect_get("/books/7").return_ok(json!({ "id": 7, "title": "X" }));

    let store = TestStore::new(books(&http).get_module());
    store.dispatch("getBook", json!(7)).await.unwrap();

    assert_eq!(store.get("currentBook"), json!({ "id": 7, "title": "X" }));
    assert_eq!(store.get("gettingBook"), json!(false));
}

#[tokio::test]
async fn test_update_and_delete_keep_collection_in_sync() {
    let http = MockHttpClient::new();
    http.expect_put("/books/2").return_ok(json!({ "id": 2, "title": "New" }));
    http.expect_delete("/books/1").return_ok(Value::Null);

    let module = books(&http)
        .with_update_state_after_action(true)
        .with_refresh_after_action(false)
        .get_module();
    let store = TestStore::new(module);
    store.set(
        "books",
        json!([{ "id": 1, "title": "A" }, { "id": 2, "title": "Old" }, { "id": 3, "title": "C" }]),
    );

    store
        .dispatch("updateBook", json!({ "id": 2, "title": "New" }))
        .await
        .unwrap();
    assert_eq!(
        store.get("books"),
        json!([{ "id": 1, "title": "A" }, { "id": 2, "title": "New" }, { "id": 3, "title": "C" }])
    );

    store.dispatch("deleteBook", json!(1)).await.unwrap();
    assert_eq!(
        store.get("books"),
        json!([{ "id": 2, "title": "New" }, { "id": 3, "title": "C" }])
    );

    let (_, payload) = store
        .commit_log()
        .into_iter()
        .find(|(name, _)| name == "DELETE_BOOK")
        .unwrap();
    assert_eq!(payload, Payload::new(Value::Null, json!(1)));
    http.verify();
}

#[tokio::test]
async fn test_mutating_actions_skip_commit_by_default() {
    let http = MockHttpClient::new();
    http.expect_post("/books").return_ok(json!({ "id": 1 }));

    let module = books(&http).with_refresh_after_action(false).get_module();
    let store = TestStore::new(module);
    store.dispatch("createBook", json!({})).await.unwrap();

    assert_eq!(store.get("books"), Value::Null);
    assert_eq!(store.commits(), vec!["SET_CREATING_BOOK", "SET_CREATING_BOOK"]);
}

#[tokio::test]
async fn test_commit_state_off_leaves_state_untouched() {
    let http = MockHttpClient::new();
    http.expect_get("/books").return_ok(json!([{ "id": 1 }]));

    let store = TestStore::new(books(&http).with_commit_state(false).get_module());
    let result = store.dispatch("fetchBooks", Value::Null).await.unwrap();

    assert_eq!(result, Some(json!([{ "id": 1 }])));
    assert_eq!(store.get("books"), Value::Null);
}

#[tokio::test]
async fn test_refresh_after_mutating_action() {
    let http = MockHttpClient::new();
    let store = TestStore::new(books(&http).get_module());

    http.expect_delete("/books/4").return_ok(Value::Null);
    let observer = store.clone();
    http.expect_get("/books").return_with(move |_| {
        assert_eq!(observer.get("deletingBook"), json!(true));
        Ok(HttpResponse::ok(json!([{ "id": 5 }])))
    });

    store.dispatch("deleteBook", json!(4)).await.unwrap();

    assert_eq!(store.get("books"), json!([{ "id": 5 }]));
    assert_eq!(
        store.commits(),
        vec![
            "SET_DELETING_BOOK",
            "SET_FETCHING_BOOKS",
            "SET_BOOKS",
            "SET_FETCHING_BOOKS",
            "SET_DELETING_BOOK",
        ]
    );
    http.verify();
}

#[tokio::test]
async fn test_failed_refresh_is_handled_once() {
    let http = MockHttpClient::new();
    http.expect_delete("/books/4").return_ok(Value::Null);
    http.expect_get("/books").return_status(500, Value::Null);

    let errors = Recorder::default();
    let store = TestStore::new(books(&http).on_action_error(errors.rethrowing()).get_module());

    let err = store.dispatch("deleteBook", json!(4)).await.unwrap_err();

    assert_eq!(
        err,
        CrudError::Request(RequestError::Status {
            status: 500,
            body: Value::Null,
        })
    );
    assert_eq!(errors.calls().len(), 1);
    assert_eq!(errors.calls()[0].0, "fetchItems");
    assert_eq!(store.get("deletingBook"), json!(false));
    assert_eq!(store.get("fetchingBooks"), json!(false));
    http.verify();
}

#[tokio::test]
async fn test_swallowed_refresh_failure_completes_the_action() {
    let http = MockHttpClient::new();
    http.expect_delete("/books/4").return_ok(json!({ "deleted": 4 }));
    http.expect_get("/books").return_err(RequestError::Transport("reset".into()));

    let errors = Recorder::default();
    let store = TestStore::new(books(&http).on_action_error(errors.swallowing()).get_module());

    let result = store.dispatch("deleteBook", json!(4)).await.unwrap();

    assert_eq!(result, Some(json!({ "deleted": 4 })));
    assert_eq!(
        errors.calls(),
        vec![(
            "fetchItems".to_string(),
            "transport error: reset".to_string(),
            "books".to_string()
        )]
    );
    assert_eq!(store.get("deletingBook"), json!(false));
    http.verify();
}

#[tokio::test]
async fn test_refresh_skipped_without_fetch_action() {
    let http = MockHttpClient::new();
    http.expect_post("/books").return_ok(json!({ "id": 1 }));

    let module = books(&http)
        .with_action_selection([CrudVerb::CreateItem])
        .get_module();
    let store = TestStore::new(module);
    store.dispatch("createBook", json!({})).await.unwrap();

    assert_eq!(http.requests().len(), 1);
    http.verify();
}

#[tokio::test]
async fn test_success_handler_receives_state_data() {
    let http = MockHttpClient::new();
    http.expect_get("/books").return_ok(json!({ "books": [{ "id": 1 }], "total": 1 }));

    let calls = Recorder::default();
    let module = books(&http)
        .with_custom_api_definition(|def: RequestDescriptor, _: &str, _: CrudVerb, _: &Value| {
            let state_mapper = mappers::field("books");
            let data_mapper = mappers::field("total");
            def.with_state_mapper(move |v| state_mapper(v))
                .with_data_mapper(move |v| data_mapper(v))
        })
        .on_action_success(calls.success())
        .get_module();
    let store = TestStore::new(module);

    let result = store.dispatch("fetchBooks", Value::Null).await.unwrap();

    assert_eq!(result, Some(json!(1)));
    assert_eq!(store.get("books"), json!([{ "id": 1 }]));
    assert_eq!(
        calls.calls(),
        vec![(
            "fetchItems".to_string(),
            r#"[{"id":1}]"#.to_string(),
            "books".to_string()
        )]
    );
}

#[tokio::test]
async fn test_custom_api_definition_redirects_request() {
    let http = MockHttpClient::new();
    http.expect_post("/books/filter").return_ok(json!([{ "id": 2 }]));

    let module = books(&http)
        .with_custom_api_definition(
            |def: RequestDescriptor, resource: &str, verb: CrudVerb, data: &Value| {
                if verb == CrudVerb::FetchItems {
                    RequestDescriptor::new(Method::Post, format!("/{resource}/filter"))
                        .with_body(data.clone())
                } else {
                    def
                }
            },
        )
        .get_module();
    let store = TestStore::new(module);

    store
        .dispatch("fetchBooks", json!({ "author": 3 }))
        .await
        .unwrap();

    assert_eq!(store.get("books"), json!([{ "id": 2 }]));
    assert_eq!(http.requests()[0].data, Some(json!({ "author": 3 })));
}

#[tokio::test]
async fn test_state_shape_error_bypasses_handler() {
    let http = MockHttpClient::new();
    http.expect_post("/books").return_ok(json!({ "id": 1 }));

    let errors = Recorder::default();
    let module = books(&http)
        .with_update_state_after_action(true)
        .with_refresh_after_action(false)
        .on_action_error(errors.swallowing())
        .get_module();
    let store = TestStore::new(module);
    store.set("books", json!("not a list"));

    let err = store.dispatch("createBook", json!({})).await.unwrap_err();

    assert_eq!(err, CrudError::StateShape { key: "books".into() });
    assert!(errors.calls().is_empty());
    assert_eq!(store.get("creatingBook"), json!(false));
}

#[tokio::test]
async fn test_invalid_action_data_goes_to_handler() {
    let http = MockHttpClient::new();
    let errors = Recorder::default();
    let store = TestStore::new(books(&http).on_action_error(errors.rethrowing()).get_module());

    let err = store
        .dispatch("deleteBook", json!({ "id": 1 }))
        .await
        .unwrap_err();

    assert!(matches!(err, CrudError::InvalidActionData { .. }));
    assert_eq!(errors.calls().len(), 1);
    assert_eq!(errors.calls()[0].0, "deleteItem");
    assert!(http.requests().is_empty());
    assert_eq!(store.get("deletingBook"), json!(false));
}

#[tokio::test]
async fn test_unselected_action_is_unknown() {
    let http = MockHttpClient::new();
    let module = books(&http)
        .with_action_selection([CrudVerb::FetchItems])
        .get_module();
    let store = TestStore::new(module);

    let err = store.dispatch("deleteBook", json!(1)).await.unwrap_err();
    assert_eq!(err, CrudError::UnknownAction("deleteBook".into()));
}

#[tokio::test]
async fn test_concurrent_fetches_settle_with_flag_lowered() {
    let http = MockHttpClient::new();
    http.expect_get("/books").return_ok(json!([{ "id": 1 }]));
    http.expect_get("/books").return_ok(json!([{ "id": 2 }]));

    let store = TestStore::new(books(&http).get_module());
    let (a, b) = tokio::join!(
        store.dispatch("fetchBooks", Value::Null),
        store.dispatch("fetchBooks", Value::Null)
    );

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(store.get("fetchingBooks"), json!(false));
    http.verify();
}
