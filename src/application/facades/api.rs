use crate::application::config::ClientConfig;
use crate::application::facades::admin::AdminFacade;
use crate::application::facades::auth::AuthFacade;
use crate::application::facades::earnings::EarningsFacade;
use crate::application::facades::entity::{
    EntityFacade, HotelsFacade, ProjectsFacade, TimeEntriesFacade,
};
use crate::application::facades::expenses::ExpensesFacade;
use crate::application::facades::payroll::PayrollFacade;
use crate::application::facades::payslips::PayslipsFacade;
use crate::application::facades::receipts::ReceiptsFacade;
use crate::application::http_client::ApiClient;
use crate::core::ports::{HttpTransport, TokenStore};
use std::sync::Arc;

/// Every facade over one shared client, handed to pages and commands.
#[derive(Clone)]
pub struct TimesheetApi {
    pub client: ApiClient,
    pub auth: AuthFacade,
    pub projects: ProjectsFacade,
    pub time_entries: TimeEntriesFacade,
    pub hotels: HotelsFacade,
    pub receipts: ReceiptsFacade,
    pub payslips: PayslipsFacade,
    pub earnings: EarningsFacade,
    pub expenses: ExpensesFacade,
    pub payroll: PayrollFacade,
    pub admin: AdminFacade,
}

impl TimesheetApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthFacade::new(client.clone()),
            projects: EntityFacade::projects(client.clone()),
            time_entries: EntityFacade::time_entries(client.clone()),
            hotels: EntityFacade::hotels(client.clone()),
            receipts: ReceiptsFacade::new(client.clone()),
            payslips: PayslipsFacade::new(client.clone()),
            earnings: EarningsFacade::new(client.clone()),
            expenses: ExpensesFacade::new(client.clone()),
            payroll: PayrollFacade::new(client.clone()),
            admin: AdminFacade::new(client.clone()),
            client,
        }
    }

    pub fn connect(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self::new(ApiClient::new(config, transport, tokens))
    }
}
