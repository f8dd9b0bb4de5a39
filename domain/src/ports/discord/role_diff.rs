use domain_shared::discord::RoleId;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoleDiff {
    pub to_assign: Vec<RoleId>,
    pub to_remove: Vec<RoleId>,
}

impl RoleDiff {
    pub fn assign(&mut self, role_id: RoleId) {
        self.to_remove.retain(|id| *id != role_id);
        if !self.to_assign.contains(&role_id) {
            self.to_assign.push(role_id);
        }
    }

    pub fn remove(&mut self, role_id: RoleId) {
        self.to_assign.retain(|id| *id != role_id);
        if !self.to_remove.contains(&role_id) {
            self.to_remove.push(role_id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_assign.is_empty() && self.to_remove.is_empty()
    }
}
