//! Diesel schema for grading persistence.

diesel::table! {
    /// Submitted attempts and their grading outcome.
    attempts (spec) {
        /// Attempt identifier.
        #[max_length = 255]
        spec -> Varchar,
        /// Author login.
        #[max_length = 255]
        author -> Varchar,
        /// Program language identifier.
        #[max_length = 255]
        language -> Varchar,
        /// Declared time and memory constraints.
        constraints -> Jsonb,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Submission timestamp.
        date -> Timestamptz,
        /// Ordered result slots.
        results -> Jsonb,
        /// Free-text answers.
        text_answers -> Jsonb,
        /// Program source.
        program -> Nullable<Text>,
        /// Final verdict code.
        verdict -> Nullable<Int4>,
        /// One-based index of the final verdict test.
        verdict_test -> Nullable<Int4>,
        /// Strategy log bundle.
        logs -> Jsonb,
    }
}

diesel::table! {
    /// Queued or in-flight grading jobs.
    grading_jobs (attempt) {
        /// Attempt identifier.
        #[max_length = 255]
        attempt -> Varchar,
        /// Raw task-type routing code.
        task_type -> Int4,
        /// Raw check-type routing code.
        task_check_type -> Int4,
        /// Custom checker program.
        checker -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Per-user-task status mirrors of attempts.
    user_task_statuses (attempt) {
        /// Attempt identifier.
        #[max_length = 255]
        attempt -> Varchar,
        /// Mirrored lifecycle status.
        #[max_length = 50]
        status -> Varchar,
    }
}

diesel::table! {
    /// Task test layouts.
    tasks (spec) {
        /// Task identifier.
        #[max_length = 255]
        spec -> Varchar,
        /// Ordered test identifiers.
        tests -> Jsonb,
        /// Declared test groups.
        test_groups -> Jsonb,
    }
}

diesel::table! {
    /// Task test cases.
    task_tests (spec) {
        /// Test identifier.
        #[max_length = 255]
        spec -> Varchar,
        /// Program input.
        input_data -> Text,
        /// Expected output.
        output_data -> Text,
    }
}

diesel::table! {
    /// Language execution offsets.
    languages (spec) {
        /// Language identifier.
        #[max_length = 255]
        spec -> Varchar,
        /// Compilation time limit in milliseconds.
        compile_offset_ms -> Int4,
        /// Extra run time in milliseconds.
        run_offset_ms -> Int4,
        /// Extra memory in megabytes.
        memory_offset_mb -> Int4,
    }
}

diesel::table! {
    /// Per-user task history.
    user_task_results (user_login, task) {
        /// User login.
        #[max_length = 255]
        user_login -> Varchar,
        /// Task identifier.
        #[max_length = 255]
        task -> Varchar,
        /// Snapshot of every graded attempt.
        results -> Jsonb,
        /// Best attempt after each grading.
        bests -> Jsonb,
    }
}

diesel::table! {
    /// User ratings.
    ratings (user_login) {
        /// User login.
        #[max_length = 255]
        user_login -> Varchar,
        /// Number of solved tasks.
        score -> Int8,
    }
}
