use serde::Serialize;

use super::{PdvService, UserService};
use crate::backend::{AuthApi, TableApi};
use crate::error::AdminResult;
use crate::models::{Cargo, Pdv, Usuario};

/// Everything the admin landing page shows, fetched in one go
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub usuarios: Vec<Usuario>,
    pub pdvs: Vec<Pdv>,
}

impl Dashboard {
    pub fn count_by_cargo(&self, cargo: Cargo) -> usize {
        self.usuarios.iter().filter(|u| u.cargo == cargo).count()
    }

    pub fn active_pdvs(&self) -> usize {
        self.pdvs.iter().filter(|p| p.ativo).count()
    }

    /// Points of sale with no promoter assigned
    pub fn unassigned_pdvs(&self) -> usize {
        self.pdvs.iter().filter(|p| p.promotor_id.is_none()).count()
    }
}

/// Loads both collections concurrently; the first failure fails the whole load
pub async fn load_dashboard<T, A, P>(users: &UserService<T, A>, pdvs: &PdvService<P>) -> AdminResult<Dashboard>
where
    T: TableApi,
    A: AuthApi,
    P: TableApi,
{
    let (usuarios, pdvs) = futures::try_join!(users.list(), pdvs.list())?;
    Ok(Dashboard { usuarios, pdvs })
}
