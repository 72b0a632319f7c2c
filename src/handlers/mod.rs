pub mod health_handler;
pub mod quiz_handler;
pub mod session_handler;

use actix_web::web;

pub use health_handler::{health_check, health_check_live, health_check_ready};

/// Registers every REST route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(health_check_live)
        .service(quiz_handler::list_available_quizzes)
        .service(quiz_handler::create_quiz_draft)
        .service(quiz_handler::get_quiz_for_taking)
        .service(quiz_handler::add_question)
        .service(quiz_handler::publish_quiz)
        .service(quiz_handler::get_results)
        .service(session_handler::start_session)
        .service(session_handler::current_session)
        .service(session_handler::get_attempt)
        .service(session_handler::submit_answer)
        .service(session_handler::submit_session);
}
