//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task this one was reassigned from.
        parent_id -> Nullable<Uuid>,
        /// Title.
        #[max_length = 500]
        title -> Varchar,
        /// Description.
        description -> Text,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Meeting-protocol flag.
        #[max_length = 20]
        protocol -> Varchar,
        /// Deadline.
        deadline -> Timestamptz,
        /// Owning department.
        department_id -> Uuid,
        /// Assignee.
        assigned_to -> Uuid,
        /// Creator.
        created_by -> Uuid,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Unread marker.
        is_new -> Bool,
        /// Applied status changes.
        history -> Jsonb,
        /// Deadline the task was last reopened against.
        overdue_waiver -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Messages owned by tasks.
    task_messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Sending user.
        sender_id -> Uuid,
        /// Message text.
        content -> Text,
        /// Posting timestamp.
        created_at -> Timestamptz,
        /// Unread marker.
        is_new -> Bool,
        /// Automated notice flag.
        is_system -> Bool,
    }
}

diesel::joinable!(task_messages -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_messages);
