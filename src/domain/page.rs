use crate::domain::page::driven_ports::TodoListSource;
use crate::domain::todo::Todo;
use crate::external_connections::ExternalConnectivity;
use tracing::warn;

/// Data backing the rendered todo page
#[derive(Debug, PartialEq, Eq)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
}

pub mod driven_ports {
    use super::*;

    pub trait TodoListSource {
        /// Fetches the todo list the page should display
        async fn fetch_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Todo>, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait PagePort {
        /// Loads everything needed to render the page. Never fails: when the todo list
        /// can't be fetched the page is rendered with no todos.
        async fn load_page(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            list_source: &impl driven_ports::TodoListSource,
        ) -> TodoPage;
    }
}

pub struct PageService {}

impl driving_ports::PagePort for PageService {
    async fn load_page(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        list_source: &impl TodoListSource,
    ) -> TodoPage {
        match list_source.fetch_todos(&mut *ext_cxn).await {
            Ok(todos) => TodoPage { todos },
            Err(fetch_err) => {
                warn!("Could not load todos for the page, rendering an empty list: {fetch_err:#}");
                TodoPage { todos: Vec::new() }
            }
        }
    }
}


#[cfg(test)]
pub mod test_util {
    use super::*;
    use crate::domain::test_util::FakeImplementation;
    use std::sync::Mutex;

    pub struct FakeTodoListSource {
        pub fetch_todos_result: FakeImplementation<(), anyhow::Result<Vec<Todo>>>,
    }

    impl FakeTodoListSource {
        pub fn new_locked() -> Mutex<FakeTodoListSource> {
            Mutex::new(FakeTodoListSource {
                fetch_todos_result: FakeImplementation::new(),
            })
        }
    }

    impl driven_ports::TodoListSource for Mutex<FakeTodoListSource> {
        async fn fetch_todos(
            &self,
            _ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Todo>, anyhow::Error> {
            let mut locked_self = self.lock().expect("fake list source mutex poisoned");
            locked_self.fetch_todos_result.save_arguments(());

            locked_self.fetch_todos_result.return_value_anyhow()
        }
    }
}
