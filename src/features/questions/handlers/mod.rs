pub mod question_handler;

pub use question_handler::{
    __path_answer_question, __path_create_question, __path_delete_question, __path_edit_question,
    __path_get_question, __path_list_pending_questions, __path_list_questions,
    __path_list_user_questions, __path_update_question_status, answer_question, create_question,
    delete_question, edit_question, get_question, list_pending_questions, list_questions,
    list_user_questions, update_question_status,
};
