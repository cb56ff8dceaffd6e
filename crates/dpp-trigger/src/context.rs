//! Read-only view handed to trigger rules.

use dpp_contract::DataContract;
use dpp_core::UserId;
use dpp_document::DataProvider;

/// What a trigger rule may consult: persisted state through the data
/// provider, the acting user and the resolved contract. It never owns the
/// document under validation.
#[derive(Clone, Copy)]
pub struct DataTriggerExecutionContext<'a> {
    data_provider: &'a dyn DataProvider,
    user_id: &'a UserId,
    data_contract: &'a DataContract,
}

impl<'a> DataTriggerExecutionContext<'a> {
    pub fn new(
        data_provider: &'a dyn DataProvider,
        user_id: &'a UserId,
        data_contract: &'a DataContract,
    ) -> Self {
        Self {
            data_provider,
            user_id,
            data_contract,
        }
    }

    pub fn data_provider(&self) -> &'a dyn DataProvider {
        self.data_provider
    }

    pub fn user_id(&self) -> &'a UserId {
        self.user_id
    }

    pub fn data_contract(&self) -> &'a DataContract {
        self.data_contract
    }
}

impl std::fmt::Debug for DataTriggerExecutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTriggerExecutionContext")
            .field("user_id", self.user_id)
            .field("data_contract", self.data_contract.id())
            .finish_non_exhaustive()
    }
}
