mod controller;
pub use controller::DashboardController;

mod panels;
pub use panels::{ChartCard, DataActions};

mod periods;
pub use periods::PeriodPicker;

mod status;
pub use status::{ExportStatus, StatusLine};
