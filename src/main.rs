use std::process::ExitCode;

use folio_studio::{logging, NoticeLevel, Settings, Studio, Tab};

const SETTINGS_PATH: &str = "folio.json";

#[actix_web::main]
async fn main() -> ExitCode {
    let settings = match Settings::load_or_default(SETTINGS_PATH) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("Settings load error: {}", error);
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = logging::init(&settings) {
        eprintln!("Logging disabled: {}", error);
    }

    let mut studio = Studio::new(&settings);
    studio.mount_all().await;

    for tab in Tab::ALL {
        studio.select(tab);
        println!("{}", studio.render_active());
        print_notices(&mut studio, tab);
        println!();
    }

    println!("Logs: {}", logging::current_log_file(&settings).display());
    ExitCode::SUCCESS
}

fn print_notices(studio: &mut Studio, tab: Tab) {
    for notice in studio.take_notices(tab) {
        match notice.level {
            NoticeLevel::Success => println!("{}: {}", notice.title, notice.message),
            NoticeLevel::Error => eprintln!("{}: {}", notice.title, notice.message),
        }
    }
}
