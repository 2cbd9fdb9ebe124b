//! User service: SMOS account administration, enrollment requests and the
//! children parents look after.

use casebook_domain::enrollment::{EnrollmentForm, EnrollmentRequest};
use casebook_domain::error::{AuthError, CasebookError, ConflictError, ValidationError};
use casebook_domain::id::{EnrollmentRequestId, StudentId, UserId};
use casebook_domain::student::Student;
use casebook_domain::user::{NewUserForm, Role, User};

use crate::ports::{EnrollmentRequestRepository, StudentRepository, UserRepository};

pub struct UserService<S> {
    store: S,
}

impl<S> UserService<S>
where
    S: UserRepository + EnrollmentRequestRepository + StudentRepository,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a user from an administrator's form.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule,
    /// [`ConflictError::LoginTaken`] or [`ConflictError::EmailTaken`], or a
    /// storage error.
    pub async fn create(&self, form: &NewUserForm) -> Result<User, CasebookError> {
        let user = User::create(form)?;
        if self.store.find_user_by_login(&user.login).await?.is_some() {
            tracing::warn!(login = %user.login, "user creation rejected, login taken");
            return Err(ConflictError::LoginTaken(user.login).into());
        }
        if self.store.find_user_by_email(&user.email).await?.is_some() {
            tracing::warn!(email = %user.email, "user creation rejected, email taken");
            return Err(ConflictError::EmailTaken(user.email).into());
        }
        let user = self.store.create_user(user).await?;
        tracing::info!(user_id = %user.id, login = %user.login, "user created");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown login or a
    /// wrong password, or a storage error.
    pub async fn login(&self, login: &str, password: &str) -> Result<User, CasebookError> {
        match self.store.find_user_by_login(login.trim()).await? {
            Some(user) if user.password.verify(password) => {
                tracing::info!(user_id = %user.id, "user logged in");
                Ok(user)
            }
            _ => {
                tracing::warn!(login, "user login rejected");
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get(&self, id: UserId) -> Result<User, CasebookError> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<User>, CasebookError> {
        self.store.list_users().await
    }

    /// Grant a role. Granting a role the user already has is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn assign_role(&self, id: UserId, role: Role) -> Result<User, CasebookError> {
        let mut user = self.get(id).await?;
        if !user.roles.insert(role) {
            return Ok(user);
        }
        let user = self.store.update_user(user).await?;
        tracing::info!(user_id = %id, %role, "role assigned");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn remove_role(&self, id: UserId, role: Role) -> Result<User, CasebookError> {
        let mut user = self.get(id).await?;
        if !user.roles.remove(&role) {
            return Ok(user);
        }
        let user = self.store.update_user(user).await?;
        tracing::info!(user_id = %id, %role, "role removed");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete(&self, id: UserId) -> Result<(), CasebookError> {
        self.get(id).await?;
        self.store.delete_user(id).await?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Store a guest's request for a student account.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule,
    /// [`ConflictError::LoginTaken`] or [`ConflictError::EmailTaken`] when a
    /// user or another pending request already uses them, or a storage error.
    pub async fn submit_request(
        &self,
        form: &EnrollmentForm,
    ) -> Result<EnrollmentRequest, CasebookError> {
        let request = EnrollmentRequest::submit(form)?;
        self.ensure_free(&request.login, &request.email).await?;
        if let Some(pending) = self.store.find_request(&request.login, &request.email).await? {
            tracing::warn!(login = %request.login, "enrollment request rejected, already pending");
            return Err(if pending.login == request.login {
                ConflictError::LoginTaken(request.login)
            } else {
                ConflictError::EmailTaken(request.email)
            }
            .into());
        }
        let request = self.store.create_request(request).await?;
        tracing::info!(request_id = %request.id, login = %request.login, "enrollment requested");
        Ok(request)
    }

    /// Requests waiting for an administrator, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn pending_requests(&self) -> Result<Vec<EnrollmentRequest>, CasebookError> {
        self.store.list_requests().await
    }

    /// Turn a pending request into a student account.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`ConflictError::LoginTaken`] or
    /// [`ConflictError::EmailTaken`] when an account was created meanwhile,
    /// or a storage error.
    pub async fn accept_request(&self, id: EnrollmentRequestId) -> Result<User, CasebookError> {
        let request = self.request(id).await?;
        self.ensure_free(&request.login, &request.email).await?;
        let user = self.store.create_user(request.into_user()).await?;
        self.store.delete_request(id).await?;
        tracing::info!(request_id = %id, user_id = %user.id, "enrollment request accepted");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn reject_request(&self, id: EnrollmentRequestId) -> Result<(), CasebookError> {
        self.request(id).await?;
        self.store.delete_request(id).await?;
        tracing::info!(request_id = %id, "enrollment request rejected");
        Ok(())
    }

    /// Link a student to a parent account. Linking twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the user or student is
    /// missing, [`ValidationError::Rule`] when the user is not a parent, or a
    /// storage error.
    pub async fn assign_child(&self, parent: UserId, student: StudentId) -> Result<(), CasebookError> {
        let user = self.get(parent).await?;
        if !user.has_role(Role::Parent) {
            tracing::warn!(user_id = %parent, "child assignment rejected, user is not a parent");
            return Err(ValidationError::Rule("only parents can be assigned children").into());
        }
        self.student(student).await?;
        self.store.add_child(parent, student).await?;
        tracing::info!(user_id = %parent, student_id = %student, "child assigned");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the user is missing, or a
    /// storage error.
    pub async fn remove_child(&self, parent: UserId, student: StudentId) -> Result<(), CasebookError> {
        self.get(parent).await?;
        self.store.remove_child(parent, student).await?;
        tracing::info!(user_id = %parent, student_id = %student, "child removed");
        Ok(())
    }

    /// Students linked to a parent, in linking order.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the user is missing, or a
    /// storage error.
    pub async fn children(&self, parent: UserId) -> Result<Vec<Student>, CasebookError> {
        self.get(parent).await?;
        let mut children = Vec::new();
        for id in self.store.children_of(parent).await? {
            if let Some(student) = self.store.get_student(id).await? {
                children.push(student);
            }
        }
        Ok(children)
    }

    async fn ensure_free(&self, login: &str, email: &str) -> Result<(), CasebookError> {
        if self.store.find_user_by_login(login).await?.is_some() {
            return Err(ConflictError::LoginTaken(login.to_string()).into());
        }
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(ConflictError::EmailTaken(email.to_string()).into());
        }
        Ok(())
    }

    async fn request(&self, id: EnrollmentRequestId) -> Result<EnrollmentRequest, CasebookError> {
        self.store
            .get_request(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    async fn student(&self, id: StudentId) -> Result<Student, CasebookError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }
}
