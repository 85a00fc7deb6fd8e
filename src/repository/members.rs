//! Members repository

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{next_id, same_text};
use crate::{
    error::AppResult,
    models::{LoanPolicy, Member, MemberBuilder, MemberFactory, MemberRef, NewMember},
};

#[derive(Clone)]
pub struct MembersRepository {
    items: Arc<RwLock<Vec<MemberRef>>>,
    factory: Arc<dyn MemberFactory>,
}

impl MembersRepository {
    /// Members built by this repository are bound to `policy`
    pub fn new(policy: LoanPolicy) -> Self {
        Self::with_factory(Arc::new(MemberBuilder::new(policy)))
    }

    pub fn with_factory(factory: Arc<dyn MemberFactory>) -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            factory,
        }
    }

    fn items(&self) -> RwLockReadGuard<'_, Vec<MemberRef>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn items_mut(&self) -> RwLockWriteGuard<'_, Vec<MemberRef>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a new member under the next free id
    pub fn add_member(
        &self,
        first_name: &str,
        last_name: &str,
        contact_phone: &str,
        email_address: &str,
    ) -> AppResult<MemberRef> {
        let mut items = self.items_mut();
        let id = next_id(items.iter().map(|member| member.read().id()))?;
        let fields = NewMember::new(first_name, last_name, contact_phone, email_address);
        let member = MemberRef::new(self.factory.make_member(fields, id)?);
        items.push(member.clone());

        tracing::debug!("Added member {}", id);
        Ok(member)
    }

    /// Get member by ID
    pub fn get_by_id(&self, id: i32) -> Option<MemberRef> {
        self.items()
            .iter()
            .find(|member| member.read().id() == id)
            .cloned()
    }

    pub fn list_members(&self) -> Vec<MemberRef> {
        self.items().clone()
    }

    pub fn find_by_last_name(&self, last_name: &str) -> Vec<MemberRef> {
        self.filter(|member| same_text(member.last_name(), last_name))
    }

    pub fn find_by_email_address(&self, email_address: &str) -> Vec<MemberRef> {
        self.filter(|member| same_text(member.email_address(), email_address))
    }

    /// Members matching both first and last name
    pub fn find_by_names(&self, first_name: &str, last_name: &str) -> Vec<MemberRef> {
        self.filter(|member| {
            same_text(member.first_name(), first_name) && same_text(member.last_name(), last_name)
        })
    }

    fn filter(&self, predicate: impl Fn(&Member) -> bool) -> Vec<MemberRef> {
        self.items()
            .iter()
            .filter(|member| predicate(&*member.read()))
            .cloned()
            .collect()
    }
}
