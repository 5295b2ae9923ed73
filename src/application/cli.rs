use crate::application::{Config, Picker, PickerView, PickerViewResult, TextRenderer, Theme};
use crate::domain::{FieldIds, IncludeDays, PickerOptions};
use crate::infrastructure::ExternalValue;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "datepicker")]
#[command(about = "A calendar date and date-range picker for the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Select a start/end range instead of a single date
    #[arg(long, global = true)]
    pub range: bool,

    /// Start weeks on Monday
    #[arg(long, global = true)]
    pub monday: bool,

    /// Adjacent-month days to show: none, previous-month, next-month or all
    #[arg(long, global = true)]
    pub include: Option<IncludeDays>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the month grid
    Show {
        /// Date to select and view (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Number of consecutive months to print
        #[arg(short, long, default_value_t = 1)]
        months: u32,
    },
    /// Pick a date interactively and print it as JSON
    Pick {
        /// Initially selected date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Print the effective options as JSON
    Resolve,
}

impl Cli {
    pub fn run() -> anyhow::Result<()> {
        let cli = Self::parse();
        let config = Config::from_env()?;
        cli.execute(&config)
    }

    /// Command-line flags as option overrides. Unset flags leave the key absent.
    pub fn flag_overrides(&self) -> PickerOptions {
        PickerOptions {
            select_range: self.range.then_some(true),
            first_calendar_day: self.monday.then_some(1),
            include_days: self.include,
            ..Default::default()
        }
    }

    pub fn execute(self, config: &Config) -> anyhow::Result<()> {
        let mut field_ids = FieldIds::new();
        let mut picker = Picker::new(field_ids.next_id());
        picker.set_options(&config.overrides.clone().overlay(self.flag_overrides()));

        match self.command {
            Some(Commands::Show { date, months }) => {
                if let Some(date) = date {
                    picker.write_value(Some(ExternalValue::Text(date)))?;
                }

                let renderer = TextRenderer::new();
                for i in 0..months.max(1) {
                    if i > 0 {
                        println!();
                        picker.next_month();
                    }
                    println!("{}", renderer.render_month(&picker));
                }
            }
            Some(Commands::Resolve) => {
                println!("{}", serde_json::to_string_pretty(picker.options())?);
            }
            Some(Commands::Pick { date }) => {
                Self::pick(&mut picker, date, config)?;
            }
            None => {
                // Default: interactive picker
                Self::pick(&mut picker, None, config)?;
            }
        }

        Ok(())
    }

    fn pick(picker: &mut Picker, date: Option<String>, config: &Config) -> anyhow::Result<()> {
        if let Some(date) = date {
            picker.write_value(Some(ExternalValue::Text(date)))?;
        }

        let result = {
            let mut view = PickerView::new(picker, Theme::by_name(&config.theme))?;
            view.run()?
        }; // view is dropped here, restoring the terminal

        match result {
            PickerViewResult::Confirmed(Some(value)) => {
                println!("{}", serde_json::to_string(&value)?);
            }
            PickerViewResult::Confirmed(None) => {
                log::warn!("Picker closed without a selection");
            }
            PickerViewResult::Cancelled => {
                log::info!("Picker cancelled");
            }
        }
        Ok(())
    }
}
