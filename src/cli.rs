use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use agency_admin::api::{self, ApiClient, ListSource, NewCourse, ResourceService};
use agency_admin::auth::{AuthContext, LoginCredentials};
use agency_admin::config::Config;
use agency_admin::models::{Resource, ResourceKind};
use agency_admin::state::{FilterCriteria, FilterKey, FilterPatch, ResourceList};
use agency_admin::tui;
use agency_admin::tui::components::Tabular;
use agency_admin::tui::ui::fit_width;

#[derive(Parser)]
#[command(name = "agency-admin")]
#[command(about = "Admin dashboard for institutions, health insurance, visa services, skill assessments and accommodation")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the terminal dashboard
    Tui,

    /// List records of a resource
    List {
        /// institutions, insurance, visa, skill-assessments or accommodation
        resource: ResourceKind,

        /// Only records for this country
        #[arg(short, long)]
        country: Option<String>,

        /// Case-insensitive text search on the record name
        #[arg(short, long)]
        search: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (defaults to AGENCY_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show every field of one record
    Get {
        resource: ResourceKind,
        id: String,
    },

    /// Delete one record
    Delete {
        resource: ResourceKind,
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show, add or remove the courses of an institution
    Courses {
        /// Institution id
        id: String,

        /// Add a course with this name
        #[arg(long, conflicts_with = "remove")]
        add: Option<String>,

        /// Commission for the added course, e.g. "15%"
        #[arg(long, requires = "add")]
        commission: Option<String>,

        /// Remove the stored course entry at this index (starting at 0)
        #[arg(long)]
        remove: Option<usize>,
    },

    /// Download the institutions spreadsheet
    Export {
        /// Output file (defaults to a timestamped file in AGENCY_EXPORT_DIR)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload an institutions spreadsheet
    Import {
        /// XLSX file to upload
        file: PathBuf,
    },

    /// Sign in and print the session token
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show the user for the configured token
    Whoami,
}

impl Commands {
    /// The dashboard owns the terminal, so it must not log to stderr
    pub fn is_tui(&self) -> bool {
        matches!(self, Commands::Tui)
    }
}

/// Run a parsed command against the backend
pub async fn execute(command: Commands, config: &Config, client: ApiClient) -> Result<()> {
    match command {
        Commands::Tui => tui::run(config, client).await,

        Commands::List {
            resource,
            country,
            search,
            page,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(config.page_size);
            let mut patch = FilterPatch::new().page_size(page_size);
            if let Some(country) = country {
                patch = patch.set(FilterKey::Country, country);
            }
            if let Some(search) = search {
                if resource == ResourceKind::SkillAssessments {
                    bail!("Skill assessments are filtered by occupation group and pathway, not --search");
                }
                patch = patch.set(FilterKey::Search, search);
            }

            match resource {
                ResourceKind::Institutions => {
                    list_resource(api::institutions(client), patch, page, page_size).await
                }
                ResourceKind::Insurance => {
                    list_resource(api::health_insurances(client), patch, page, page_size).await
                }
                ResourceKind::VisaServices => {
                    list_resource(api::visa_services(client), patch, page, page_size).await
                }
                ResourceKind::SkillAssessments => {
                    list_resource(api::skill_assessments(client), patch, page, page_size).await
                }
                ResourceKind::Accommodation => {
                    let service = api::AccommodationService::new(client);
                    list_resource(service, patch, page, page_size).await
                }
            }
        }

        Commands::Get { resource, id } => match resource {
            ResourceKind::Institutions => get_resource(api::institutions(client), &id).await,
            ResourceKind::Insurance => get_resource(api::health_insurances(client), &id).await,
            ResourceKind::VisaServices => get_resource(api::visa_services(client), &id).await,
            ResourceKind::SkillAssessments => {
                get_resource(api::skill_assessments(client), &id).await
            }
            ResourceKind::Accommodation => {
                let service = api::AccommodationService::new(client);
                let items = service.list(&FilterCriteria::new(config.page_size)).await?;
                match items.iter().find(|item| item.id() == id) {
                    Some(item) => {
                        print_details(item);
                        Ok(())
                    }
                    None => bail!("Accommodation {} not found", id),
                }
            }
        },

        Commands::Delete { resource, id, yes } => {
            if !yes && !confirm(&format!("Delete {} {}?", resource.singular(), id))? {
                println!("Cancelled");
                return Ok(());
            }
            match resource {
                ResourceKind::Institutions => delete_resource(api::institutions(client), &id).await,
                ResourceKind::Insurance => {
                    delete_resource(api::health_insurances(client), &id).await
                }
                ResourceKind::VisaServices => delete_resource(api::visa_services(client), &id).await,
                ResourceKind::SkillAssessments => {
                    delete_resource(api::skill_assessments(client), &id).await
                }
                ResourceKind::Accommodation => bail!("Accommodation records are read-only"),
            }
        }

        Commands::Courses {
            id,
            add,
            commission,
            remove,
        } => {
            let service = api::institutions(client);
            let institution = if let Some(course) = add {
                let course = NewCourse {
                    course,
                    commission: commission.unwrap_or_default(),
                };
                service.add_course(&id, &course).await?
            } else if let Some(index) = remove {
                service.remove_course(&id, index).await?
            } else {
                service.get(&id).await?
            };

            let courses = institution.line_items();
            println!("{} - {} courses", institution.name, courses.len());
            println!();
            for (i, item) in courses.iter().enumerate() {
                println!("{:>3}  {}  {}", i, fit_width(&item.name, 60), item.commission);
            }
            Ok(())
        }

        Commands::Export { output } => {
            let service = api::institutions(client);
            let path = service
                .export_to(&config.export_dir, output.as_deref())
                .await?;
            println!("Exported institutions to {}", path.display());
            Ok(())
        }

        Commands::Import { file } => {
            let service = api::institutions(client);
            let summary = service
                .import_xlsx(&file)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?;
            match summary.count {
                Some(count) => println!("{} ({} records)", summary.message, count),
                None => println!("{}", summary.message),
            }
            Ok(())
        }

        Commands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            let mut auth = AuthContext::new(client.clone());
            let user = auth.login(&LoginCredentials { email, password }).await?;
            println!("Signed in as {}", user.display_name());
            if let Some(token) = client.token() {
                println!("export AGENCY_API_TOKEN={}", token);
            }
            Ok(())
        }

        Commands::Whoami => {
            client.require_token()?;
            let mut auth = AuthContext::new(client);
            auth.initialize().await;
            match auth.user() {
                Some(user) => {
                    println!("{} <{}>", user.display_name(), user.email);
                    if let Some(role) = &user.role {
                        println!("Role: {}", role);
                    }
                    Ok(())
                }
                None => bail!("Not signed in. Run `agency-admin login` or set AGENCY_API_TOKEN"),
            }
        }
    }
}

async fn list_resource<S>(service: S, patch: FilterPatch, page: usize, page_size: usize) -> Result<()>
where
    S: ListSource,
    S::Entity: Tabular,
{
    let mut list = ResourceList::new(service, page_size);
    list.update_filters(&patch).await;
    if page > 1 {
        list.set_page(page).await;
    }
    if let Some(error) = list.error() {
        bail!("{}", error);
    }

    let visible = list.visible();
    if visible.is_empty() {
        println!("No {} found", list.kind().plural());
        return Ok(());
    }

    print_table(&visible);
    println!();
    println!(
        "{} (page {} of {})",
        list.summary(),
        list.criteria().page,
        list.total_pages()
    );
    Ok(())
}

async fn get_resource<S>(service: S, id: &str) -> Result<()>
where
    S: ResourceService,
    S::Entity: Tabular,
{
    let entity = service.get(id).await?;
    print_details(&entity);
    Ok(())
}

async fn delete_resource<S: ResourceService>(service: S, id: &str) -> Result<()> {
    service.delete(id).await?;
    println!("Deleted {} {}", S::Entity::KIND.singular(), id);
    Ok(())
}

fn print_table<E: Tabular>(entities: &[&E]) {
    let columns = E::columns();
    let header: Vec<String> = columns.iter().map(|c| fit_width(c.title, c.width)).collect();
    println!("{}", header.join("  "));
    let total_width: usize = columns.iter().map(|c| c.width + 2).sum();
    println!("{}", "-".repeat(total_width));

    for entity in entities {
        let row: Vec<String> = columns
            .iter()
            .zip(entity.cells())
            .map(|(column, cell)| fit_width(&cell, column.width))
            .collect();
        println!("{}  {}", row.join("  "), entity.id());
    }
}

fn print_details<E: Tabular>(entity: &E) {
    println!("{:<26}{}", "ID", entity.id());
    for (label, value) in entity.details() {
        println!("{:<26}{}", label, value);
    }

    let items = entity.line_items();
    if !items.is_empty() {
        let (item_label, commission_label) = E::line_item_labels();
        println!();
        println!("{}s ({})", item_label, items.len());
        for item in items {
            println!("  - {}  {}: {}", item.name, commission_label, item.commission);
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
