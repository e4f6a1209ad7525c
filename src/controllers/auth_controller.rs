use validator::Validate;

use crate::dto::auth_dto::{CreateUserRequest, LoginRequest, LoginResponse, MeResponse};
use crate::dto::vehicle_dto::validate_department;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserProfile;
use crate::services::auth_service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::{into_result, non_empty, push_field_error};

pub struct AuthController {
    service: AuthService,
    state: AppState,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: AuthService::new(state.pool.clone(), state.jwt_config()),
            state: state.clone(),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        let (token, user) = self.service.login(&request.email, &request.password).await?;
        let departments = user.visible_departments(self.state.departments());
        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: self.state.config.jwt_expiration,
            user,
            departments,
        })
    }

    /// Perfil actual; se relee de la base para reflejar cambios de rol
    pub async fn me(&self, user: &AuthenticatedUser) -> AppResult<MeResponse> {
        let profile = self
            .service
            .find_profile(user.id())
            .await?
            .unwrap_or_else(|| user.profile().clone());
        let departments = profile.visible_departments(self.state.departments());
        Ok(MeResponse {
            user: profile,
            departments,
        })
    }

    pub async fn list_users(&self, user: &AuthenticatedUser) -> AppResult<Vec<UserProfile>> {
        user.ensure_admin()?;
        self.service.list_profiles().await
    }

    pub async fn create_user(
        &self,
        user: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> AppResult<ApiResponse<UserProfile>> {
        user.ensure_admin()?;

        let mut errors = request.validate().err().unwrap_or_else(validator::ValidationErrors::new);
        let department = non_empty(request.department);
        if let Some(department) = &department {
            push_field_error(
                &mut errors,
                "department",
                validate_department(department, self.state.departments()),
            );
        }
        for department in &request.departments {
            push_field_error(
                &mut errors,
                "departments",
                validate_department(department, self.state.departments()),
            );
        }
        into_result(errors)?;

        let created = self
            .service
            .create_user(
                &request.email,
                &request.password,
                request.role,
                department.as_deref(),
                &request.departments,
            )
            .await?;

        tracing::info!(email = %created.email, role = created.role.as_str(), admin = %user.email(), "Usuario creado");

        Ok(ApiResponse::success_with_message(
            UserProfile::from(created),
            "Usuario creado exitosamente",
        ))
    }
}
