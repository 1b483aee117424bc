//! List-screen command handling, generic over the resource behind the screen
//!
//! Every resource screen runs the same set of commands (paging, filtering,
//! sorting, selection, CRUD, export) against its own [`PageState`]. The
//! [`ScreenState`] trait binds each resource type to its state field so one
//! generic driver serves all eight screens.

use colored::*;
use moneta_link::{
    Account, Customer, Export, ExportFormat, Invoice, Order, Product, Receipt, Role, Transaction,
};

use crate::error::{CliError, Result};
use crate::forms::{FormResource, FormValues};
use crate::pages::PageState;
use crate::parser::{Command, SelectTarget};

use super::CliSession;

/// Binds a resource type to its list state on the session
pub(super) trait ScreenState<R: FormResource> {
    fn state(&self) -> &PageState<R>;
    fn state_mut(&mut self) -> &mut PageState<R>;
}

macro_rules! screen_state {
    ($resource:ty, $field:ident) => {
        impl ScreenState<$resource> for CliSession {
            fn state(&self) -> &PageState<$resource> {
                &self.$field
            }
            fn state_mut(&mut self) -> &mut PageState<$resource> {
                &mut self.$field
            }
        }
    };
}

screen_state!(Product, products);
screen_state!(Customer, customers);
screen_state!(Transaction, transactions);
screen_state!(Invoice, invoices);
screen_state!(Receipt, receipts);
screen_state!(Order, orders);
screen_state!(Account, accounts);
screen_state!(Role, roles);

impl CliSession {
    /// Run one list-screen command against the state for resource `R`
    pub(super) async fn resource_command<R>(&mut self, command: Command) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        match command {
            Command::List | Command::Refresh => self.refetch::<R>(true).await,
            Command::Next => {
                if self.state_mut().next_page() {
                    self.refetch::<R>(true).await
                } else {
                    println!("{}", "Already on the last page".dimmed());
                    Ok(())
                }
            }
            Command::Prev => {
                if self.state_mut().prev_page() {
                    self.refetch::<R>(true).await
                } else {
                    println!("{}", "Already on the first page".dimmed());
                    Ok(())
                }
            }
            Command::Goto(page) => {
                if self.state_mut().goto_page(page) {
                    self.refetch::<R>(true).await
                } else {
                    println!("{}", "Already on that page".dimmed());
                    Ok(())
                }
            }
            Command::Filter(Some(text)) => self.apply_filter::<R>(&text).await,
            Command::Filter(None) => {
                if self.state_mut().clear_filters() {
                    println!("Search and filters cleared");
                    self.refetch::<R>(true).await
                } else {
                    println!("{}", "No search or filters are set".dimmed());
                    Ok(())
                }
            }
            Command::Sort { field, order } => {
                if self.state_mut().set_sort(field, order) {
                    self.refetch::<R>(true).await
                } else {
                    println!("{}", "Sort unchanged".dimmed());
                    Ok(())
                }
            }
            Command::Select(target) => {
                self.apply_select::<R>(target);
                Ok(())
            }
            Command::Show(id) => self.show_record::<R>(id).await,
            Command::Add(fields) => self.create_record::<R>(&fields).await,
            Command::Edit { id, rest } => self.update_record::<R>(id, &rest).await,
            Command::Delete(id) => self.delete_record::<R>(id).await,
            Command::BulkDelete => self.bulk_delete::<R>().await,
            Command::Export(format) => self.export_collection::<R>(format).await,
            _ => Err(CliError::Parse(format!(
                "that command does not apply to the {} screen",
                R::LABEL
            ))),
        }
    }

    /// Fetch the current page for `R` and render it when `render` is set
    ///
    /// A response for a query the user has since changed is dropped by the
    /// fetch ticket, so stale pages never overwrite fresh ones.
    pub(super) async fn refetch<R>(&mut self, render: bool) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let ticket = self.state_mut().begin_fetch();
        let query = self.state().query().clone();

        let pb = self.spinner(&format!("Loading {}s...", R::LABEL));
        let result = self.session.client().list::<R>(&query).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        match result {
            Ok(page) => {
                if self.state_mut().apply(ticket, page) && render {
                    self.render_page::<R>()?;
                }
                Ok(())
            }
            Err(e) => {
                let err = CliError::from(e);
                self.state_mut().fail(ticket, err.to_string());
                Err(err)
            }
        }
    }

    /// Render the page currently held for `R`
    fn render_page<R>(&self) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        if let Some(page) = self.state().page() {
            let text = self.formatter.format_page(page, self.state().selection())?;
            print_block(&text);
        }
        Ok(())
    }

    /// `filter price=9.99` toggles a field filter; anything else becomes
    /// the free-text search
    async fn apply_filter<R>(&mut self, text: &str) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let changed = match text.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !text.contains(' ') => {
                let key = key.trim().to_string();
                let value = value.trim().to_string();
                self.state_mut().toggle_filter(&key, &value)
            }
            _ => self.state_mut().set_search(Some(text.to_string())),
        };

        if changed {
            self.refetch::<R>(true).await
        } else {
            println!("{}", "Filter unchanged".dimmed());
            Ok(())
        }
    }

    /// Toggle, fill, or clear the bulk-delete selection
    fn apply_select<R>(&mut self, target: SelectTarget)
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        match target {
            SelectTarget::Id(id) => {
                let selected = self.state_mut().toggle_select(id);
                let verb = if selected { "Selected" } else { "Deselected" };
                println!(
                    "{} {} ({} selected)",
                    verb,
                    id,
                    self.state().selection().len()
                );
            }
            SelectTarget::All => {
                let count = self.state_mut().select_page();
                println!("{} selected", count);
            }
            SelectTarget::None => {
                self.state_mut().clear_selection();
                println!("Selection cleared");
            }
        }
    }

    /// Fetch and print one record in full
    async fn show_record<R>(&mut self, id: u64) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let pb = self.spinner(&format!("Loading {} {}...", R::LABEL, id));
        let result = self.session.client().get::<R>(id).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let record = result?;
        print_block(&self.formatter.format_record(&record)?);
        Ok(())
    }

    /// Create a record from `field=value` form input
    async fn create_record<R>(&mut self, fields: &str) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let values = FormValues::parse(fields)?;
        let draft = R::draft_from(&values, None)?;

        let pb = self.spinner(&format!("Creating {}...", R::LABEL));
        let result = self.session.client().create::<R>(&draft).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let record = result?;

        println!("{}", format!("✓ Created {} {}", R::LABEL, record.id()).green());
        self.refetch::<R>(true).await
    }

    /// Update fields on a record, leaving unnamed fields as they are
    async fn update_record<R>(&mut self, id: u64, fields: &str) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let values = FormValues::parse(fields)?;

        // The current record backfills the fields the edit leaves out
        let pb = self.spinner(&format!("Loading {} {}...", R::LABEL, id));
        let current = self.session.client().get::<R>(id).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let current = current?;
        let draft = R::draft_from(&values, Some(&current))?;

        let pb = self.spinner(&format!("Updating {} {}...", R::LABEL, id));
        let result = self.session.client().update::<R>(id, &draft).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result?;

        println!("{}", format!("✓ Updated {} {}", R::LABEL, id).green());
        self.refetch::<R>(true).await
    }

    /// Delete one record
    async fn delete_record<R>(&mut self, id: u64) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let pb = self.spinner(&format!("Deleting {} {}...", R::LABEL, id));
        let result = self.session.client().delete::<R>(id).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result?;

        println!("{}", format!("✓ Deleted {} {}", R::LABEL, id).green());
        self.state_mut().deselect(id);
        self.refetch::<R>(true).await
    }

    /// Delete every selected record in one request
    async fn bulk_delete<R>(&mut self) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let ids = self.state().selected_ids();
        if ids.is_empty() {
            println!(
                "{}",
                "Nothing selected. Use select <id> or select all first.".dimmed()
            );
            return Ok(());
        }

        let pb = self.spinner(&format!("Deleting {} {}s...", ids.len(), R::LABEL));
        let result = self.session.client().delete_many::<R>(&ids).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let deleted = result?;

        println!(
            "{}",
            format!("✓ Deleted {} of {} {}s", deleted, ids.len(), R::LABEL).green()
        );
        self.state_mut().after_bulk_delete();
        self.refetch::<R>(true).await
    }

    /// Export the collection with the current search, filters, and sort
    async fn export_collection<R>(&mut self, format: ExportFormat) -> Result<()>
    where
        R: FormResource,
        Self: ScreenState<R>,
    {
        let query = self.state().query().clone();

        let pb = self.spinner(&format!("Exporting {}s as {}...", R::LABEL, format));
        let result = self.session.client().export::<R>(format, &query).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let export = result?;

        self.save_export(&export)
    }

    /// Write exported bytes to the working directory
    pub(super) fn save_export(&self, export: &Export) -> Result<()> {
        std::fs::write(&export.filename, &export.bytes)?;
        println!(
            "{}",
            format!("✓ Wrote {} ({} bytes)", export.filename, export.bytes.len()).green()
        );
        Ok(())
    }

    /// List the permission catalog (fixed, unpaginated)
    pub(super) async fn show_permissions(&mut self) -> Result<()> {
        self.require_signed_in()?;

        let pb = self.spinner("Loading permissions...");
        let result = self.session.client().list_permissions().await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let permissions = result?;

        let width = permissions.iter().map(|p| p.code.len()).max().unwrap_or(0);
        for permission in &permissions {
            // Pad before coloring so the escape codes don't count as width
            let code = format!("{:width$}", permission.code, width = width);
            println!("{}  {}", code.yellow(), permission.description);
        }
        let label = if permissions.len() == 1 {
            "permission"
        } else {
            "permissions"
        };
        println!("({} {})", permissions.len(), label);
        Ok(())
    }
}

/// Print formatter output, which may or may not end in a newline
fn print_block(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}
