//! Services handling client administration, notes and CSV import.

use std::io::Read;

use chrono::NaiveDate;

use crate::domain::client::{Client, HistoryEntry, NewClient};
use crate::domain::types::ClientId;
use crate::dto::clients::ClientsPageData;
use crate::forms::client::{
    AddClientForm, AddClientNoteForm, AddClientNotePayload, SaveClientForm, SaveClientPayload,
    parse_clients_csv,
};
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

fn fetch_client<R>(repo: &R, client_id: &ClientId) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(client_id)?.ok_or_else(|| {
        log::warn!("Client {client_id} not found");
        ServiceError::NotFound
    })
}

fn store_client<R>(repo: &R, client: &Client) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    repo.replace_client(client).map_err(|err| {
        log::error!("Failed to update client {}: {err}", client.id);
        ServiceError::from(err)
    })
}

/// Loads the clients list, honoring the search term and filters in `query`.
pub fn list_clients<R>(repo: &R, query: ClientListQuery) -> ServiceResult<ClientsPageData>
where
    R: ClientReader + ?Sized,
{
    let search_query = query.search.term().map(str::to_string);
    let (total, clients) = repo.list_clients(&query)?;

    Ok(ClientsPageData {
        clients,
        total,
        search_query,
    })
}

/// Validates the add-client form and registers an active client on `today`.
pub fn add_client<R>(repo: &R, form: AddClientForm, today: NaiveDate) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let new_client = NewClient::try_from(form).map_err(|err| {
        log::error!("Failed to validate client form: {err}");
        ServiceError::from(err)
    })?;

    let client = new_client.into_client(today);
    repo.create_clients(std::slice::from_ref(&client))
        .map_err(|err| {
            log::error!("Failed to add a client: {err}");
            ServiceError::from(err)
        })?;

    Ok(client)
}

/// Applies the edit form. A plan change is recorded in the client's history.
pub fn update_client<R>(repo: &R, form: SaveClientForm, today: NaiveDate) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let SaveClientPayload { id, updates } = SaveClientPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate client form: {err}");
        ServiceError::from(err)
    })?;

    let client = fetch_client(repo, &id)?;
    store_client(repo, &client.updated(&updates, today))
}

/// Activates or suspends a client account.
pub fn set_client_active<R>(
    repo: &R,
    client_id: &ClientId,
    active: bool,
    today: NaiveDate,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let client = fetch_client(repo, client_id)?;
    if client.active == active {
        return Ok(client);
    }
    store_client(repo, &client.with_active(active, today))
}

/// Appends an observation to the client's history.
pub fn add_client_note<R>(
    repo: &R,
    form: AddClientNoteForm,
    today: NaiveDate,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let AddClientNotePayload { id, text } = AddClientNotePayload::try_from(form)?;

    let mut client = fetch_client(repo, &id)?;
    client.history.push(HistoryEntry::observation(today, &text));
    store_client(repo, &client)
}

/// Imports clients from CSV, returning how many were created.
///
/// The file is parsed completely before anything is stored; one bad row
/// aborts the whole import.
pub fn import_clients_csv<R, F>(repo: &R, file: F, today: NaiveDate) -> ServiceResult<usize>
where
    R: ClientWriter + ?Sized,
    F: Read,
{
    let clients: Vec<Client> = parse_clients_csv(file)
        .map_err(|err| {
            log::error!("Failed to parse clients: {err}");
            ServiceError::from(err)
        })?
        .into_iter()
        .map(|new_client| new_client.into_client(today))
        .collect();

    let created = repo.create_clients(&clients).map_err(|err| {
        log::error!("Failed to add clients: {err}");
        ServiceError::from(err)
    })?;
    log::info!("Imported {created} clients");

    Ok(created)
}
