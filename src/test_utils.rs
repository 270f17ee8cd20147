#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::{
        models::domain::{Problem, SolutionRecord, User, UserRole},
        services::mastery::MasteryLevel,
    };

    /// User with a fixed id so expectations can match on it.
    pub fn user_with_id(id: &str, role: UserRole) -> User {
        let mut user = User::new(id, &format!("{}@example.com", id), role);
        user.id = id.to_string();
        user
    }

    pub fn student(id: &str) -> User {
        user_with_id(id, UserRole::Student)
    }

    pub fn problem(id: &str, correct_answer: &str) -> Problem {
        let mut problem = Problem::new(
            &format!("Problem {}", id),
            "Solve for x",
            "math",
            correct_answer,
            "teacher-1",
        );
        problem.id = id.to_string();
        problem
    }

    /// Latest record of `problem_id` at `level`, due at `due`.
    pub fn due_record(user_id: &str, problem_id: &str, due: DateTime<Utc>, level: u8) -> SolutionRecord {
        let mut record = SolutionRecord::new(user_id, problem_id, "answer", level > 0);
        record.next_review_date = due;
        record.mastery_level = MasteryLevel::new(level).unwrap_or(MasteryLevel::RETIRED);
        record
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use chrono::Utc;

    use super::{fixtures::*, test_helpers::*};

    #[test]
    fn test_fixture_ids_are_stable() {
        assert_eq!(student("u1").id, "u1");
        assert_eq!(problem("p1", "42").id, "p1");

        let record = due_record("u1", "p1", Utc::now(), 2);
        assert_eq!(record.mastery_level.value(), 2);
        assert!(record.is_correct);
    }

    #[test]
    fn test_status_helpers() {
        assert_success_status(StatusCode::CREATED);
        assert_error_status(StatusCode::FORBIDDEN);
    }
}
