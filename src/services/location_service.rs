// src/services/location_service.rs

use crate::{
    common::error::AppError,
    db::{location_repo::DistributionKind, LocationRepository},
    models::location::{Access, LocationDetail, LocationWithGrant},
};

#[derive(Clone)]
pub struct LocationService {
    repo: LocationRepository,
}

impl LocationService {
    pub fn new(repo: LocationRepository) -> Self {
        Self { repo }
    }

    /// Falha com `AccessDenied` a menos que exista um grant com a flag exigida.
    /// Sem grant e grant sem a flag são indistinguíveis para quem chama.
    pub async fn require_grant(
        &self,
        user_id: i32,
        location_id: i32,
        access: Access,
    ) -> Result<(), AppError> {
        let permitted = self.repo
            .find_grant(user_id, location_id)
            .await?
            .is_some_and(|grant| grant.permits(access));

        if !permitted {
            tracing::warn!(user_id, location_id, ?access, "Acesso negado à loja");
            return Err(AppError::AccessDenied);
        }

        Ok(())
    }

    /// Loja + distribuições (Segunda..Domingo) + fornecedores ativos.
    /// Nenhum dado da loja é lido antes de o grant ser confirmado.
    pub async fn get_location_detail(
        &self,
        user_id: i32,
        location_id: i32,
    ) -> Result<LocationDetail, AppError> {
        self.require_grant(user_id, location_id, Access::View).await?;

        let location = self.repo
            .find_by_id(location_id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        let sales_distribution = self.repo
            .find_distribution(DistributionKind::Sales, location_id)
            .await?;
        let purchasing_distribution = self.repo
            .find_distribution(DistributionKind::Purchasing, location_id)
            .await?;
        let vendors = self.repo.find_active_vendors(location_id).await?;

        Ok(LocationDetail {
            location,
            sales_distribution,
            purchasing_distribution,
            vendors,
        })
    }

    /// Lojas que o usuário pode visualizar.
    pub async fn list_user_locations(&self, user_id: i32) -> Result<Vec<LocationWithGrant>, AppError> {
        let locations = self.repo.list_for_user(user_id).await?;
        Ok(locations.into_iter().filter(|l| l.can_view).collect())
    }
}
