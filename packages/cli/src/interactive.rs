//! Menu-driven dashboard session.
//!
//! Each menu entry maps to one dashboard control; after every action the
//! four panels are printed again.

use dialoguer::Select;
use tourism_map_cli_utils::{IndicatifProgress, MultiProgress};
use tourism_map_dashboard::Dashboard;
use tourism_map_dashboard_models::Metric;
use tourism_map_dashboard_models::calendar::MONTH_NAMES;
use tourism_map_views::Panel;

use crate::text::render_text;

enum Action {
    Year,
    Month,
    Metric,
    Region,
    ResetRegion,
    Origin,
    Reload,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Year,
        Self::Month,
        Self::Metric,
        Self::Region,
        Self::ResetRegion,
        Self::Origin,
        Self::Reload,
        Self::Quit,
    ];

    const fn label(&self) -> &'static str {
        match self {
            Self::Year => "Select year",
            Self::Month => "Select month",
            Self::Metric => "Switch metric",
            Self::Region => "Select region",
            Self::ResetRegion => "Reset region",
            Self::Origin => "Inspect an origin country",
            Self::Reload => "Reload data",
            Self::Quit => "Quit",
        }
    }
}

fn print_panels(dashboard: &Dashboard) {
    println!();
    print!("{}", render_text(&dashboard.frames()));
    println!();
}

fn pick_year(dashboard: &Dashboard) -> Result<(), dialoguer::Error> {
    let years = dashboard.available_years();
    if years.is_empty() {
        println!("The data has no years.");
        return Ok(());
    }
    let current = dashboard.state().year;
    let labels: Vec<String> = years.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("Year")
        .items(&labels)
        .default(years.iter().position(|y| Some(*y) == current).unwrap_or(0))
        .interact()?;
    dashboard.set_year(years[idx]);
    Ok(())
}

fn pick_month(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let current = usize::from(dashboard.state().month.saturating_sub(1));
    let idx = Select::new()
        .with_prompt("Month")
        .items(&MONTH_NAMES)
        .default(current)
        .interact()?;
    dashboard.set_month(u8::try_from(idx + 1)?)?;
    Ok(())
}

fn pick_metric(dashboard: &Dashboard) -> Result<(), dialoguer::Error> {
    let metrics = Metric::all();
    let labels: Vec<&str> = metrics.iter().map(|m| m.label()).collect();
    let current = dashboard.state().metric;
    let idx = Select::new()
        .with_prompt("Metric")
        .items(&labels)
        .default(metrics.iter().position(|m| *m == current).unwrap_or(0))
        .interact()?;
    dashboard.set_metric(metrics[idx]);
    Ok(())
}

fn pick_region(dashboard: &Dashboard) -> Result<(), dialoguer::Error> {
    let mut regions: Vec<(String, String)> = dashboard
        .data()
        .dataset
        .regions
        .iter()
        .map(|r| (r.key.clone(), r.label.clone()))
        .collect();
    regions.sort_by(|a, b| a.1.cmp(&b.1));
    if regions.is_empty() {
        println!("The map has no regions.");
        return Ok(());
    }
    let labels: Vec<&str> = regions.iter().map(|(_, label)| label.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Region (selecting the current one deselects it)")
        .items(&labels)
        .default(0)
        .interact()?;
    dashboard.click_region(&regions[idx].0);
    Ok(())
}

fn inspect_origin(dashboard: &Dashboard) -> Result<(), dialoguer::Error> {
    let Some(frame) = dashboard.frame(Panel::Bars) else {
        return Ok(());
    };
    let tourism_map_views::PanelScene::Bars(scene) = &frame.scene else {
        return Ok(());
    };
    let countries: Vec<&str> = scene.bars().iter().map(|b| b.country.as_str()).collect();
    if countries.is_empty() {
        println!("Select a region first.");
        return Ok(());
    }
    let idx = Select::new()
        .with_prompt("Origin country")
        .items(&countries)
        .default(0)
        .interact()?;
    if let Some(tooltip) = dashboard.hover(Panel::Bars, countries[idx], (0.0, 0.0)) {
        println!("{}", tooltip.to_text());
    }
    dashboard.clear_hover();
    Ok(())
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or a reload cannot read the data.
pub async fn run(
    mut dashboard: Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    print_panels(&dashboard);

    loop {
        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Year => pick_year(&dashboard)?,
            Action::Month => pick_month(&dashboard)?,
            Action::Metric => pick_metric(&dashboard)?,
            Action::Region => pick_region(&dashboard)?,
            Action::ResetRegion => dashboard.reset_region(),
            Action::Origin => {
                inspect_origin(&dashboard)?;
                continue;
            }
            Action::Reload => {
                let progress = IndicatifProgress::files_bar(multi, "Reloading data files");
                dashboard.reload(&progress).await?;
            }
            Action::Quit => break,
        }
        print_panels(&dashboard);
    }

    Ok(())
}
