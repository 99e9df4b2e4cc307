use std::fmt;

use anyhow::Context;
use chrono::NaiveDate;
use inquire::{CustomType, InquireError, Select, Text};
use weatherstack_core::{
    DashboardController, FailurePolicy, MarineQuery, Tab, ViewState, WeatherClient,
    render::CurrentView,
};

use crate::cli::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Open(Tab),
    EditDate,
    EditCoords,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("Search city"),
            Action::Open(tab) => write!(f, "{tab} tab"),
            Action::EditDate => f.write_str("Pick history date"),
            Action::EditCoords => f.write_str("Set marine coordinates"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn actions_for(tab: Tab) -> Vec<Action> {
    let mut actions = vec![Action::Search];
    actions.extend(Tab::all().iter().filter(|t| **t != tab).map(|t| Action::Open(*t)));
    match tab {
        Tab::History => actions.push(Action::EditDate),
        Tab::Marine => actions.push(Action::EditCoords),
        Tab::Current => {}
    }
    actions.push(Action::Quit);
    actions
}

/// Run the dashboard until the user quits or presses Esc / Ctrl-C.
pub async fn run<C>(client: &C, policy: FailurePolicy, city: Option<String>) -> anyhow::Result<()>
where
    C: WeatherClient + ?Sized,
{
    let mut dash = DashboardController::new(policy);
    if let Some(city) = city {
        dash.set_query(city);
    }

    // Initial load
    dash.submit(client).await;

    loop {
        println!("\n{}", render_tab(&dash));

        let action = match Select::new("Action:", actions_for(dash.tab())).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read action"),
        };

        match action {
            Action::Search => {
                let Some(query) = prompt_or_cancel(
                    Text::new("City:").with_default(dash.query()).prompt(),
                )?
                else {
                    continue;
                };
                dash.set_query(query.trim());
                dash.select_tab(Tab::Current);
                println!("Loading...");
                dash.submit(client).await;
            }
            Action::Open(tab) => dash.select_tab(tab),
            Action::EditDate => {
                let date = CustomType::<NaiveDate>::new("Date (yyyy-MM-dd):")
                    .with_default(dash.history().date)
                    .with_error_message("Please enter a date like 2024-01-31")
                    .prompt();
                if let Some(date) = prompt_or_cancel(date)? {
                    dash.set_history_date(date);
                }
            }
            Action::EditCoords => {
                let coords = CustomType::<MarineQuery>::new("Coordinates (lat,lon):")
                    .with_error_message("Please enter coordinates like 36.1,-5.35")
                    .prompt();
                if let Some(coords) = prompt_or_cancel(coords)? {
                    dash.set_marine_coords(coords);
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Esc on a sub-prompt returns to the menu instead of leaving the dashboard.
fn prompt_or_cancel<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(err) => Err(err).context("Failed to read input"),
    }
}

fn render_tab(dash: &DashboardController) -> String {
    let header = Tab::all()
        .iter()
        .map(|t| if *t == dash.tab() { format!("[{t}]") } else { format!(" {t} ") })
        .collect::<Vec<_>>()
        .join(" ");

    let body = match dash.tab() {
        Tab::Current => render_current(dash),
        Tab::History => format!(
            "Historical Data\n\
             Placeholder for: {}\n\
             Historical data requires a paid plan; try `weatherstack historical \"{}\" --date {}`.",
            format_date(dash.history().date),
            dash.query(),
            format_date(dash.history().date),
        ),
        Tab::Marine => {
            let coords = dash
                .marine()
                .coords
                .map(|c| c.to_string())
                .unwrap_or_else(|| "not set".to_string());
            format!(
                "Marine Weather\n\
                 Coordinates: {coords}\n\
                 Requires Standard Plan or higher; try `weatherstack marine <lat,lon>`."
            )
        }
    };

    format!("{header}\n\n{body}")
}

fn render_current(dash: &DashboardController) -> String {
    match dash.current_state() {
        ViewState::Idle => "Search for a city to begin.".to_string(),
        ViewState::Loading { .. } => "Loading...".to_string(),
        ViewState::Loaded(snapshot) => CurrentView::from(snapshot).to_string(),
        ViewState::Failed { message, .. } => match dash.displayed_snapshot() {
            Some(stale) => {
                format!("Error: {message}\n\nLast result:\n{}", CurrentView::from(stale))
            }
            None => format!("Error: {message}"),
        },
    }
}
