//! Diesel schema for the organisation directory.

diesel::table! {
    /// Registered users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        full_name -> Varchar,
        /// Contact e-mail address.
        #[max_length = 255]
        email -> Varchar,
        /// Avatar reference.
        avatar_url -> Nullable<Text>,
        /// Department membership.
        department_id -> Nullable<Uuid>,
        /// Leader reference.
        leader_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Departments.
    departments (id) {
        /// Department identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Managing user.
        manager_id -> Nullable<Uuid>,
        /// Creating user.
        created_by -> Uuid,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, departments);
