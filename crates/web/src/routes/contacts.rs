//! Read-only pages: the prisoner's contact list, contact details and the success page shown after
//! a relationship is created.

use super::parse_prisoner;
use crate::error::AppResult;
use crate::templates::{render, PageMeta};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use contacts_api_client::Pagination;
use contacts_core::constants::SEARCH_PAGE_SIZE;
use contacts_core::journey::RestrictionClass;
use contacts_core::navigation::urls;
use minijinja::context;
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prisoner/:prisoner_number/contacts/list", get(contact_list))
        .route(
            "/prisoner/:prisoner_number/contacts/manage/:contact_id/relationship/:prisoner_contact_id",
            get(contact_details),
        )
        .route(
            "/prisoner/:prisoner_number/contacts/:contact_id/relationship/:prisoner_contact_id/success",
            get(relationship_success),
        )
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    /// Pages are numbered from 1 in URLs and from 0 by the API.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page.unwrap_or(1).saturating_sub(1), SEARCH_PAGE_SIZE)
    }
}

async fn contact_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(prisoner_number): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let results = state
        .api
        .get_prisoner_contacts(prisoner_number.as_str(), query.pagination(), &user.token)
        .await?;

    let contacts: Vec<_> = results
        .content
        .iter()
        .map(|c| {
            context! {
                name => c.formatted_name(),
                date_of_birth => c.date_of_birth,
                relationship => c.relationship_to_prisoner_description.clone()
                    .unwrap_or_else(|| c.relationship_to_prisoner_code.clone()),
                is_emergency_contact => c.is_emergency_contact,
                is_next_of_kin => c.is_next_of_kin,
                is_approved_visitor => c.is_approved_visitor,
                is_active => c.is_relationship_active,
                url => urls::contact_details(&prisoner_number, c.contact_id, c.prisoner_contact_id),
            }
        })
        .collect();

    let page = PageMeta::new("Contacts");
    render(
        "contact_list.html",
        &page,
        context! {
            prisoner_number => prisoner_number.as_str(),
            contacts => contacts,
            add_contact_url => urls::add_contact_start(&prisoner_number),
            page_number => results.number + 1,
            total_pages => results.total_pages,
            total_elements => results.total_elements,
        },
    )
}

async fn contact_details(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((prisoner_number, contact_id, prisoner_contact_id)): Path<(String, i64, i64)>,
) -> AppResult<Html<String>> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let api = &state.api;
    let contact = api.get_contact(contact_id, &user.token).await?;
    let relationship = api
        .get_prisoner_contact_relationship(prisoner_contact_id, &user.token)
        .await?;
    let restrictions = api
        .get_prisoner_contact_restrictions(prisoner_contact_id, &user.token)
        .await?;
    let linked = api.get_linked_prisoners(contact_id, &user.token).await?;

    let page = PageMeta::new("Contact details")
        .back(urls::contact_list(&prisoner_number))
        .caption(Some(contact.formatted_name()));
    render(
        "contact_details.html",
        &page,
        context! {
            contact => &contact,
            name => contact.formatted_name(),
            relationship => &relationship,
            prisoner_contact_restrictions => &restrictions.prisoner_contact_restrictions,
            contact_global_restrictions => &restrictions.contact_global_restrictions,
            linked_prisoner_count => linked.len(),
            change_relationship_type_url =>
                urls::relationship_type_start(&prisoner_number, contact_id, prisoner_contact_id),
            add_prisoner_contact_restriction_url => urls::restriction_start(
                &prisoner_number,
                contact_id,
                prisoner_contact_id,
                RestrictionClass::PrisonerContact,
            ),
            add_contact_global_restriction_url => urls::restriction_start(
                &prisoner_number,
                contact_id,
                prisoner_contact_id,
                RestrictionClass::ContactGlobal,
            ),
            contact_list_url => urls::contact_list(&prisoner_number),
        },
    )
}

async fn relationship_success(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((prisoner_number, contact_id, prisoner_contact_id)): Path<(String, i64, i64)>,
) -> AppResult<Html<String>> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let contact = state.api.get_contact(contact_id, &user.token).await?;
    let page = PageMeta::new("Contact added");
    render(
        "success.html",
        &page,
        context! {
            heading => "Contact added and linked",
            message => format!(
                "You’ve linked {} to prisoner {}.",
                contact.formatted_name(),
                prisoner_number
            ),
            primary_url => urls::contact_details(&prisoner_number, contact_id, prisoner_contact_id),
            primary_label => "View contact details",
            secondary_url => urls::contact_list(&prisoner_number),
            secondary_label => "Back to contacts",
        },
    )
}
