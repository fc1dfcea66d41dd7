#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # CRUD Bindings
//!
//! > **State-management bindings for REST resources, generated from a name.**
//!
//! Give this crate a resource name such as `"books"` and an HTTP client, and it
//! produces a namespaced module: state fields, mutations and async actions that
//! fetch, get, create, update and delete items while keeping a local cache of
//! the collection in sync.
//!
//! ```ignore
//! let module = CrudModule::new("books", http)?
//!     .with_update_state_after_action(true)
//!     .get_module();
//!
//! // state:     books, currentBook, fetchingBooks, gettingBook, creatingBook, ...
//! // mutations: SET_BOOKS, SET_CURRENT_BOOK, ADD_BOOK, UPDATE_BOOK, DELETE_BOOK, SET_FETCHING_BOOKS, ...
//! // actions:   fetchBooks, getBook, createBook, updateBook, deleteBook
//! ```
//!
//! ## 🚀 Core Concepts
//!
//! ### Action Units
//! Each verb is wrapped into an [`ActionUnit`](framework::ActionUnit) that owns a
//! loading flag, the mutation flipping it, and the async action. The action raises
//! the flag, sends the request, commits the result, and always lowers the flag,
//! on success and on failure alike.
//!
//! ### Value-Semantics Configuration
//! [`CrudModule`](framework::CrudModule) is a plain configuration record. Setters
//! consume and return it, and [`CrudModuleFactory`](framework::CrudModuleFactory)
//! hands out independent copies for other resources.
//!
//! ### Collaborators, not Runtimes
//! The crate performs no I/O and holds no store. It calls an
//! [`HttpClient`](clients::HttpClient) you provide and runs inside an
//! [`ActionContext`](clients::ActionContext) your store provides.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! [`CrudError`](framework::CrudError) separates configuration faults (raised while
//! building), request failures (routed through the error handler) and state-shape
//! faults (returned to the caller, bypassing the handler).
//!
//! ### 2. Explicit Payloads
//! Every generated action commits a [`Payload`](framework::Payload) carrying the
//! mapped response as `data` and the caller's input as `action_data`.
//!
//! ### 3. Concurrency Model
//! Each dispatched action is one future. There is no scheduler and no
//! deduplication: two concurrent `fetchBooks` calls toggle the same flag, and the
//! last one to settle decides its final value.
//!
//! ### 4. Observability
//! Actions run inside `tracing` spans tagged with resource and action name.
//! See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Name derivation, request descriptors, action units, the module builder and
//! its factory, plus the [`mock`](framework::mock) test doubles.
//!
//! ### 2. The Interface ([`clients`])
//! The contracts the engine consumes: [`HttpClient`](clients::HttpClient) and
//! [`ActionContext`](clients::ActionContext).
//!
//! ### 3. Setup ([`lifecycle`])
//! [`setup_tracing`](lifecycle::setup_tracing) for applications and tests.
//!
//! ### Running Tests
//!
//! ```bash
//! RUST_LOG=debug cargo test
//! ```

pub mod clients;
pub mod framework;
pub mod lifecycle;
