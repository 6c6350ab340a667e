use crate::infra::{load_catalog, parse_date, parse_time, FixedGeolocation, InMemorySubmissionGateway};
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use clap::Args;
use listing_studio::config::{AppConfig, ListingConfig};
use listing_studio::error::AppError;
use listing_studio::workflows::listing::service::DetailsUpdate;
use listing_studio::workflows::listing::{
    AccordionSettings, CategoryCatalog, GeocodedAddress, ListingService, ListingServiceError,
    NavigationCommand, Navigator, SessionId, SessionView,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Category names to toggle, in order. Defaults to Furniture.
    #[arg(long = "category")]
    pub(crate) categories: Vec<String>,
    /// Subcategory names to pick. Defaults to Tables.
    #[arg(long = "subcategory")]
    pub(crate) subcategories: Vec<String>,
    /// First available day (YYYY-MM-DD). Defaults to a week from today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Last available day (YYYY-MM-DD). Defaults to start + 5 days.
    #[arg(long, value_parser = parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Daily start time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub(crate) start_time: Option<NaiveTime>,
    /// Daily end time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub(crate) end_time: Option<NaiveTime>,
    /// Listing title
    #[arg(long)]
    pub(crate) title: Option<String>,
    /// Street address; when omitted the demo uses the current-location lookup
    #[arg(long)]
    pub(crate) street: Option<String>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    #[arg(long)]
    pub(crate) state: Option<String>,
    #[arg(long)]
    pub(crate) zip: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// CSV file with id,name,subcategories columns (subcategories separated by '|')
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn go_back(&self) {
        println!("  -> navigating back");
    }

    fn go_to_details_step(&self) {
        println!("  -> navigating to the details step");
    }

    fn go_to_home(&self) {
        println!("  -> navigating home");
    }
}

type DemoService = ListingService<InMemorySubmissionGateway, FixedGeolocation>;

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let config = ListingConfig {
        catalog_csv: args.csv,
        ..ListingConfig::default()
    };
    let catalog = load_catalog(&config)?;
    render_catalog(&catalog);
    Ok(())
}

fn render_catalog(catalog: &CategoryCatalog) {
    println!("Listing categories");
    for category in catalog.categories() {
        println!(
            "  [{}] {} (icon: {})",
            category.id,
            category.name,
            category.icon()
        );
        for name in &category.subcategories {
            println!("      - {}", name);
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?.listing;
    let catalog = load_catalog(&config)?;
    let geolocation = FixedGeolocation::at(GeocodedAddress {
        street: Some("400 Locust St".to_string()),
        city: Some("Des Moines".to_string()),
        region: Some("IA".to_string()),
        postal_code: Some("50309".to_string()),
    });
    let submissions = Arc::new(InMemorySubmissionGateway::default());
    let service = ListingService::new(
        catalog,
        AccordionSettings::from(&config),
        submissions.clone(),
        Arc::new(geolocation),
    );
    let navigator = ConsoleNavigator;

    println!("Create listing demo");
    let (session, view) = service.create_session();
    render_step(&view);

    let categories = if args.categories.is_empty() {
        vec!["Furniture".to_string()]
    } else {
        args.categories.clone()
    };
    let subcategories = if args.subcategories.is_empty() && args.categories.is_empty() {
        vec!["Tables".to_string()]
    } else {
        args.subcategories.clone()
    };

    for name in &categories {
        let Some(category) = service.catalog().find_by_name(name) else {
            println!("  Unknown category '{}', skipping", name);
            continue;
        };
        let id = category.id.clone();
        report(service.toggle_category(&session, &id), |_| {
            println!("  Toggled {}", name)
        })?;
    }
    for name in &subcategories {
        report(service.toggle_subcategory(&session, name), |_| {
            println!("  Picked subcategory {}", name)
        })?;
    }

    let Some((command, view)) = report(service.continue_to_details(&session), |_| ())? else {
        return Ok(());
    };
    navigator.navigate(command);
    render_step(&view);

    fill_details(&service, &session, &args)?;

    let start = args
        .start
        .unwrap_or_else(|| Local::now().date_naive() + Duration::days(7));
    let end = args.end.unwrap_or(start + Duration::days(5));
    for day in [start, end] {
        report(service.tap_day(&session, day), |view| {
            if let Some(details) = &view.details {
                println!(
                    "  Tapped {}: {} day(s) marked",
                    day,
                    details.day_count
                );
            }
        })?;
    }

    report(
        service.set_times(&session, args.start_time, args.end_time),
        |view| {
            if let Some(details) = &view.details {
                println!(
                    "  Available daily {} - {}",
                    details.start_time, details.end_time
                );
            }
        },
    )?;

    let missing = service.validation(&session)?;
    if !missing.is_empty() {
        println!("  Still missing: {}", missing.join(", "));
    }

    if let Some(acknowledgement) = report(service.publish(&session), |_| ())? {
        println!(
            "  {} (listing id {})",
            acknowledgement.message, acknowledgement.listing_id
        );
        navigator.navigate(NavigationCommand::Home);
        println!("  Submitted drafts: {}", submissions.drafts().len());
    }

    Ok(())
}

fn fill_details(service: &DemoService, session: &SessionId, args: &DemoArgs) -> Result<(), AppError> {
    let update = DetailsUpdate {
        title: Some(
            args.title
                .clone()
                .unwrap_or_else(|| "Solid oak dining table".to_string()),
        ),
        description: Some("Seats six, light wear on the top.".to_string()),
        street: args.street.clone(),
        city: args.city.clone(),
        state: args.state.clone(),
        zip: args.zip.clone(),
    };
    let manual_address = args.street.is_some();
    report(service.update_details(session, update), |_| ())?;

    if !manual_address {
        report(service.locate_address(session), |view| {
            if let Some(details) = &view.details {
                let address = &details.address;
                println!(
                    "  Located address: {}, {}, {} {}",
                    address.street, address.city, address.state, address.zip
                );
            }
        })?;
    }
    Ok(())
}

fn render_step(view: &SessionView) {
    println!(
        "\nStep: {} ({:.0}% complete)",
        view.step_label,
        view.progress * 100.0
    );
}

/// Prints the notice for rejected actions and keeps the walkthrough going.
fn report<T>(
    result: Result<T, ListingServiceError>,
    on_success: impl FnOnce(&T),
) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => {
            on_success(&value);
            Ok(Some(value))
        }
        Err(ListingServiceError::Session(err)) => {
            let notice = err.notice();
            println!("  {}: {}", notice.title, notice.message);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
