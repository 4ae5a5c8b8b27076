pub mod todo;

pub use todo::{
    InvalidField, NewTodo, NewTodoRequest, Todo, TodoEnvelope, TodoList, TodoPatch,
    UpdateTodoRequest,
};
