use uuid::Uuid;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::activity_log::ActivityAction;
use crate::models::driver::Driver;
use crate::repositories::driver_repository::DriverRepository;
use crate::services::activity_logger::ActivityLogger;
use crate::services::fleet_filters::DriverView;
use crate::services::live_updates::{ChangeKind, LiveEvent};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct DriverController {
    repository: DriverRepository,
    logger: ActivityLogger,
    state: AppState,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: DriverRepository::new(state.pool.clone()),
            logger: ActivityLogger::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    async fn find_visible(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<Driver> {
        let driver = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;
        user.ensure_department_access(&driver.department, self.state.departments())?;
        Ok(driver)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateDriverRequest,
    ) -> AppResult<ApiResponse<DriverView>> {
        let draft = request.into_draft(self.state.departments())?;
        user.ensure_can_write_department(&draft.department, self.state.departments())?;

        let driver = self.repository.create(&draft).await?;
        tracing::info!(driver_id = %driver.id, "Conductor creado");

        self.logger
            .record(
                user,
                ActivityAction::CreateDriver,
                format!("Conductor {} registrado", driver.name),
                &driver.department,
                Some(driver.id),
            )
            .await;
        self.notify(&driver);

        Ok(ApiResponse::success_with_message(
            DriverView::new(driver, self.state.today()),
            "Conductor creado exitosamente",
        ))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<DriverView> {
        let driver = self.find_visible(user, id).await?;
        Ok(DriverView::new(driver, self.state.today()))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateDriverRequest,
    ) -> AppResult<ApiResponse<DriverView>> {
        let current = self.find_visible(user, id).await?;
        user.ensure_can_write()?;

        let draft = request.apply(&current, self.state.departments())?;
        if draft.department != current.department {
            user.ensure_can_write_department(&draft.department, self.state.departments())?;
        }

        let driver = self
            .repository
            .update(id, &draft)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        self.logger
            .record(
                user,
                ActivityAction::UpdateDriver,
                format!("Conductor {} actualizado", driver.name),
                &driver.department,
                Some(driver.id),
            )
            .await;
        if current.department != driver.department {
            self.notify(&current);
        }
        self.notify(&driver);

        Ok(ApiResponse::success_with_message(
            DriverView::new(driver, self.state.today()),
            "Conductor actualizado exitosamente",
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<ApiResponse<()>> {
        let driver = self.find_visible(user, id).await?;
        user.ensure_can_write()?;

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Driver", &id.to_string()));
        }

        self.logger
            .record(
                user,
                ActivityAction::DeleteDriver,
                format!("Conductor {} eliminado", driver.name),
                &driver.department,
                Some(driver.id),
            )
            .await;
        self.notify(&driver);

        Ok(ApiResponse::message("Conductor eliminado exitosamente"))
    }

    fn notify(&self, driver: &Driver) {
        self.state
            .live
            .publish(LiveEvent::new(ChangeKind::Driver, &driver.department, driver.id));
    }
}
