#![forbid(unsafe_code)]

//! A fake video-catalog browser exercising every widget.
//!
//! All "network" operations are simulated with sleeps so the cancellable
//! bridge can be tried interactively. Run with `--log-file PATH` to see
//! the structured log without corrupting the alternate screen.

use std::error::Error as StdError;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shoji::prelude::*;
use shoji::widgets::tree;

#[derive(Debug, Clone)]
struct CatalogEntry {
    title: &'static str,
    year: u16,
    rating: f32,
    genres: &'static str,
    plot: &'static str,
}

fn sample_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            title: "Heat",
            year: 1995,
            rating: 8.3,
            genres: "crime, drama",
            plot: "A group of professional bank robbers start to feel the heat.",
        },
        CatalogEntry {
            title: "The Conversation",
            year: 1974,
            rating: 7.7,
            genres: "drama, mystery",
            plot: "A paranoid surveillance expert has a crisis of conscience.",
        },
        CatalogEntry {
            title: "Sorcerer",
            year: 1977,
            rating: 7.7,
            genres: "adventure, thriller",
            plot: "Four unfortunates drive nitroglycerin through the jungle.",
        },
        CatalogEntry {
            title: "After Hours",
            year: 1985,
            rating: 7.7,
            genres: "comedy, crime",
            plot: "One very long night in SoHo.",
        },
    ]
}

fn catalog_rows(entries: &[CatalogEntry]) -> Vec<Row> {
    entries
        .iter()
        .map(|e| {
            Row::from(vec![
                Column::new(e.title),
                Column::new(e.year.to_string()),
                Column::new(format!("{:.1}", e.rating)),
                Column::styled(e.genres, ColorPair::CyanBlack),
            ])
        })
        .collect()
}

fn browse(screen: &Screen, entries: &[CatalogEntry]) -> Result<(), Box<dyn StdError>> {
    let mut panel = ScrollingPanel::new(screen, catalog_rows(entries))
        .with_header(vec!["Title", "Year", "Rating", "Genres"])
        .with_inner_padding(2);
    while let Some(index) = panel.pick_a_line_or_cancel()? {
        let entry = &entries[index];
        info!(title = entry.title, "showing detail");
        MessagePanel::new(
            screen,
            vec![
                Row::from((entry.title, ColorPair::YellowBlack)),
                Row::horizontal_line(),
                Row::from(format!("Year:   {}", entry.year)),
                Row::from(format!("Rating: {:.1}", entry.rating)),
                Row::from(format!("Genres: {}", entry.genres)),
                Row::from(""),
                Row::from(entry.plot),
            ],
        )
        .run()?;
        panel.show()?;
    }
    panel.hide()?;
    Ok(())
}

#[cfg(unix)]
fn search(screen: &Screen, entries: &[CatalogEntry]) -> Result<(), Box<dyn StdError>> {
    let Some(query) = InputPanel::new(screen, "Search title: ", "").run()? else {
        return Ok(());
    };
    let haystack: Vec<(String, u16)> = entries
        .iter()
        .map(|e| (e.title.to_lowercase(), e.year))
        .collect();
    let needle = query.to_lowercase();

    // Pretend this is a slow remote lookup.
    let outcome = run_cancellable_dialog(screen, "Searching, press Escape to cancel...", move || {
        std::thread::sleep(std::time::Duration::from_millis(1200));
        Ok(haystack
            .into_iter()
            .filter(|(title, _)| title.contains(&needle))
            .collect::<Vec<_>>())
    })?;

    match outcome {
        TaskOutcome::Completed(matches) if matches.is_empty() => {
            MessagePanel::new(screen, vec![format!("No matches for \"{query}\"")]).run()?;
        }
        TaskOutcome::Completed(matches) => {
            let rows: Vec<String> = matches
                .into_iter()
                .map(|(title, year)| format!("{title} ({year})"))
                .collect();
            MessagePanel::new(screen, rows).run()?;
        }
        TaskOutcome::Failed(_) | TaskOutcome::Cancelled => {
            info!("search ended without results");
        }
    }
    Ok(())
}

#[cfg(unix)]
fn flaky_fetch(screen: &Screen) -> Result<(), Box<dyn StdError>> {
    // Always fails after a delay: demonstrates the worker-failure path.
    let outcome: TaskOutcome<()> =
        run_cancellable_dialog(screen, "Fetching metadata from the archive...", || {
            std::thread::sleep(std::time::Duration::from_millis(900));
            Err(TaskError::message("archive returned unexpected markup"))
        })?;
    if outcome.is_cancelled() {
        info!("fetch cancelled by operator");
    }
    Ok(())
}

fn edit_entry(screen: &Screen, entry: &CatalogEntry) -> Result<(), Box<dyn StdError>> {
    let mut value = serde_json::json!({
        "title": entry.title,
        "year": entry.year,
        "rating": entry.rating,
        "genres": entry.genres,
        "plot": entry.plot,
    });
    if tree::edit_json(screen, &mut value)? {
        info!(%value, "entry edited");
        MessagePanel::new(
            screen,
            vec![
                Row::from("Edited entry (not persisted):"),
                Row::horizontal_line(),
                Row::from(serde_json::to_string_pretty(&value)?),
            ],
        )
        .run()?;
    }
    Ok(())
}

fn run_menu(screen: &Screen) -> Result<(), Error> {
    let entries = sample_catalog();

    let browse_screen = screen.clone();
    let browse_entries = entries.clone();
    let edit_screen = screen.clone();
    let edit_entries = entries.clone();

    let mut items = vec![
        MenuItem::new("Browse catalog", move || {
            browse(&browse_screen, &browse_entries)
        }),
        MenuItem::new("Edit first entry as JSON", move || {
            edit_entry(&edit_screen, &edit_entries[0])
        }),
    ];

    #[cfg(unix)]
    {
        let search_screen = screen.clone();
        let search_entries = entries.clone();
        let flaky_screen = screen.clone();
        items.push(MenuItem::new("Search (slow, cancellable)", move || {
            search(&search_screen, &search_entries)
        }));
        items.push(MenuItem::new("Fetch metadata (always fails)", move || {
            flaky_fetch(&flaky_screen)
        }));
    }

    items.push(MenuItem::separator());
    items.push(MenuItem::label_only("Escape quits"));

    let quit_screen = screen.clone();
    MainMenu::new(screen, items)
        .with_quit_confirm(move || {
            DialogBox::new(&quit_screen, vec!["Really quit?"], &["Quit", "Stay"])
                .run()
                .is_ok_and(|choice| choice.as_deref() == Some("Quit"))
        })
        .run_modally()
}

fn init_logging(path: &str) -> Result<(), Box<dyn StdError>> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn StdError>> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--log-file" => {
                let path = args.next().ok_or("--log-file requires a path")?;
                init_logging(&path)?;
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    shoji::console_main(run_menu)?;
    Ok(())
}
