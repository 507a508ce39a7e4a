// Line-oriented presentation boundary. All state lives in the repository
// and services; this module only collects input and renders snapshots.

use std::io::{self, BufRead, Write};

use appointment_cell::codec;
use appointment_cell::models::{AppointmentForm, DeleteConfirmation};
use appointment_cell::services::{analytics, AppointmentFilter, MutationService};

const HELP: &str = "\
Commands:
  list            show appointments (current filter applied)
  stats           show count / average wait / max wait
  add             create a new appointment
  edit <id>       edit an appointment
  delete <id>     delete an appointment (asks for confirmation)
  filter          set day/month/name filter
  clear           clear the filter
  reload          re-fetch all appointments from the backend
  help            show this help
  quit            exit";

pub async fn run(service: &MutationService) {
    let stdin = io::stdin();
    let mut filter = AppointmentFilter::default();

    println!("Waitdesk console ready. Type 'help' for commands.");
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => println!("{HELP}"),
            "list" => list(service, &filter),
            "stats" => stats(service),
            "add" => add(service).await,
            "edit" => match arg.parse::<i64>() {
                Ok(id) => edit(service, id).await,
                Err(_) => println!("usage: edit <id>"),
            },
            "delete" => match arg.parse::<i64>() {
                Ok(id) => delete(service, id).await,
                Err(_) => println!("usage: delete <id>"),
            },
            "filter" => set_filter(&mut filter),
            "clear" => {
                filter.clear();
                println!("Filter cleared");
            }
            "reload" => match service.fetch_all().await {
                Ok(count) => println!("Reloaded {count} appointments"),
                Err(err) => println!("{err}"),
            },
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}', type 'help'"),
        }
    }
}

fn list(service: &MutationService, filter: &AppointmentFilter) {
    let repository = service.repository();
    if !repository.is_loaded() {
        println!("No data loaded yet, try 'reload'");
        return;
    }

    let records = filter.apply(&repository.all());
    if records.is_empty() {
        if filter.is_empty() {
            println!("No appointments");
        } else {
            println!("No appointments match filters");
        }
        return;
    }

    println!(
        "{:>4}  {:<20} {:<10} {:>5} {:>5} {:>8} {:<7} {:>4} {:>9}",
        "ID", "Patient", "Day", "Month", "Hour", "Lead", "Sex", "Age", "Wait(min)"
    );
    for record in &records {
        let form = codec::form_with_fallback(record);
        let flag = if analytics::is_high_wait(record) {
            "  (long wait, suggest another hour)"
        } else {
            ""
        };
        println!(
            "{:>4}  {:<20} {:<10} {:>5} {:>4}:00 {:>8} {:<7} {:>4} {:>9.1}{}",
            record.id,
            record.patient_name,
            form.day_label,
            record.month,
            record.hour,
            record.days_between_schedule_and_visit,
            form.sex_label,
            record.age,
            record.wait_minutes(),
            flag,
        );
    }
}

fn stats(service: &MutationService) {
    let stats = analytics::compute_stats(&service.repository().all());
    println!(
        "Total: {}   Average wait: {} min   Max wait: {} min",
        stats.count, stats.avg_wait, stats.max_wait
    );
}

async fn add(service: &MutationService) {
    let Some(form) = read_form(&AppointmentForm::default()) else {
        println!("Cancelled");
        return;
    };

    match service.create(&form).await {
        Ok((appointment, suggestion)) => {
            println!("Created appointment {}", appointment.id);
            if let Some(suggestion) = suggestion {
                println!("{suggestion}");
            }
        }
        Err(err) => println!("{err}"),
    }
}

async fn edit(service: &MutationService, id: i64) {
    let Some(current) = service.repository().get(id) else {
        println!("No appointment with id {id}");
        return;
    };

    let Some(form) = read_form(&codec::form_with_fallback(&current)) else {
        println!("Cancelled");
        return;
    };

    match service.update(id, &form).await {
        Ok(()) => println!("Updated appointment {id}"),
        Err(err) => println!("{err}"),
    }
}

async fn delete(service: &MutationService, id: i64) {
    let confirmation = if ask_yes_no("Delete this appointment? [y/N] ") {
        DeleteConfirmation::Confirmed
    } else {
        DeleteConfirmation::Declined
    };

    match service.delete(id, confirmation).await {
        Ok(true) => println!("Deleted appointment {id}"),
        Ok(false) => println!("Delete cancelled"),
        Err(err) => println!("{err}"),
    }
}

fn set_filter(filter: &mut AppointmentFilter) {
    filter.day = prompt_number::<u8>("Filter day 0-6 (blank for any): ");
    filter.month = prompt_number::<u8>("Filter month 1-12 (blank for any): ");
    let name = prompt("Filter name contains (blank for any): ");
    filter.name = if name.is_empty() { None } else { Some(name) };
    println!("Filter set");
}

/// Prompts for every editable field. Defaults (shown in brackets) come
/// from the supplied form, so editing keeps untouched fields. Returns
/// `None` when the operator aborts with "q".
fn read_form(defaults: &AppointmentForm) -> Option<AppointmentForm> {
    let mut form = defaults.clone();

    form.patient_name = prompt_default("Patient name", &form.patient_name)?;

    println!("Days: 0=Monday .. 6=Sunday");
    if let Some(day) = prompt_number_default("Day of week", form.day_of_week)? {
        form.select_day(day);
    }

    form.month = prompt_number_default("Month (1-12)", form.month)?;
    form.hour = prompt_number_default("Hour (9-17)", form.hour)?;
    form.days_between_schedule_and_visit =
        prompt_number_default("Days between scheduling and visit", form.days_between_schedule_and_visit)?;

    println!("Sex: 0=female, 1=male");
    if let Some(sex) = prompt_number_default("Sex", form.sex_encoded)? {
        form.select_sex(sex);
    }

    form.age = prompt_number_default("Age", form.age)?;
    Some(form)
}

fn prompt(message: &str) -> String {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line.trim().to_string()
}

/// Text prompt with a default; "q" aborts.
fn prompt_default(label: &str, default: &str) -> Option<String> {
    let input = prompt(&format!("{label} [{default}]: "));
    match input.as_str() {
        "q" => None,
        "" => Some(default.to_string()),
        _ => Some(input),
    }
}

fn prompt_number<T: std::str::FromStr>(message: &str) -> Option<T> {
    let input = prompt(message);
    if input.is_empty() {
        return None;
    }
    match input.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            println!("Not a valid number, leaving unset");
            None
        }
    }
}

/// Numeric prompt with a default; blank keeps the default, "q" aborts.
/// A non-numeric entry leaves the field unset so validation reports it.
fn prompt_number_default<T: std::str::FromStr + std::fmt::Display + Copy>(
    label: &str,
    default: Option<T>,
) -> Option<Option<T>> {
    let shown = match default {
        Some(value) => value.to_string(),
        None => String::new(),
    };
    let input = prompt(&format!("{label} [{shown}]: "));
    match input.as_str() {
        "q" => None,
        "" => Some(default),
        _ => match input.parse() {
            Ok(value) => Some(Some(value)),
            Err(_) => {
                println!("Not a valid number, leaving unset");
                Some(None)
            }
        },
    }
}

fn ask_yes_no(message: &str) -> bool {
    let answer = prompt(message);
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}
