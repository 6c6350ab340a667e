use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStep {
    Categories,
    Details,
    Completed,
}

impl ListingStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Categories => "Create your listing",
            Self::Details => "Add Listing Details",
            Self::Completed => "Listing published",
        }
    }

    /// Fill of the header progress bar.
    pub const fn progress(self) -> f32 {
        match self {
            Self::Categories => 0.5,
            Self::Details | Self::Completed => 1.0,
        }
    }
}

/// Where the host should take the user next. No draft data travels with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationCommand {
    Back,
    DetailsStep,
    Home,
}

pub trait Navigator {
    fn go_back(&self);
    fn go_to_details_step(&self);
    fn go_to_home(&self);

    fn navigate(&self, command: NavigationCommand) {
        match command {
            NavigationCommand::Back => self.go_back(),
            NavigationCommand::DetailsStep => self.go_to_details_step(),
            NavigationCommand::Home => self.go_to_home(),
        }
    }
}
