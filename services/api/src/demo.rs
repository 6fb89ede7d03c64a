use crate::infra::{
    InMemoryPriestBookingRepository, InMemoryPriestListingRepository, InMemoryProfileRepository,
    InMemoryServiceBookingRepository, LoggingChangeNotifier, StaticAccountProvider,
};
use chrono::{Duration, Utc};
use clap::Args;
use sanctum::error::AppError;
use sanctum::workflows::booking::{
    BookingService, BookingStatus, PriestBookingRequest, ServiceBookingRequest, ServiceId,
};
use sanctum::workflows::directory::{filter_entries, RoleFilter, UserDirectory};
use sanctum::workflows::priest::{ListingUpdate, PriestApplicationService};
use sanctum::workflows::profiles::{Profile, ProfileRepository, ProfileUpdate, UserId};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the booking portion of the demo.
    #[arg(long)]
    pub(crate) skip_bookings: bool,
    /// Skip the admin directory portion of the demo.
    #[arg(long)]
    pub(crate) skip_directory: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skip_bookings,
        skip_directory,
    } = args;

    println!("Sanctum platform demo");

    let profiles = Arc::new(InMemoryProfileRepository::default());
    let listings = Arc::new(InMemoryPriestListingRepository::default());
    let notifier = Arc::new(LoggingChangeNotifier::default());
    let accounts = Arc::new(StaticAccountProvider::default());

    let applications = Arc::new(PriestApplicationService::new(
        profiles.clone(),
        listings.clone(),
        notifier.clone(),
    ));
    let bookings = BookingService::new(
        Arc::new(InMemoryPriestBookingRepository::default()),
        Arc::new(InMemoryServiceBookingRepository::default()),
    );
    let directory = UserDirectory::new(profiles.clone(), accounts.clone());

    let admin_id = UserId::new("adm-1");
    let priest_id = UserId::new("usr-1");
    let devotee_id = UserId::new("usr-2");

    let mut admin = Profile::new(admin_id.clone());
    admin.first_name = Some("Asha".to_string());
    admin.last_name = Some("Nair".to_string());
    admin.is_admin = true;
    profiles.insert(admin).map_err(workflow_err)?;
    accounts.register(admin_id.clone(), "asha@sanctum.example");

    let mut applicant = Profile::new(priest_id.clone());
    applicant.first_name = Some("Ravi".to_string());
    applicant.last_name = Some("Shastri".to_string());
    profiles.insert(applicant).map_err(workflow_err)?;
    accounts.register(priest_id.clone(), "ravi@sanctum.example");

    let devotee = Profile::new(devotee_id.clone());
    profiles.insert(devotee).map_err(workflow_err)?;

    println!("\nPriest approval workflow");
    let applicant_actor = applications.actor(&priest_id)?;
    let submitted = applications.submit_application(&applicant_actor, &priest_id)?;
    println!(
        "- {} applied | status: {}",
        priest_id,
        submitted
            .priest_status
            .map(|status| status.label())
            .unwrap_or("none")
    );

    let admin_actor = applications.actor(&admin_id)?;
    let approved = applications.approve(&admin_actor, &priest_id)?;
    println!(
        "- approved by {} | listing {} ({})",
        admin_id,
        approved.listing.id,
        if approved.listing_created {
            "provisioned"
        } else {
            "already present"
        }
    );

    let update = ListingUpdate {
        description: Some("Vedic ceremonies, 20 years of practice.".to_string()),
        specialties: Some(vec![
            "Griha pravesh".to_string(),
            "Satyanarayan puja".to_string(),
        ]),
        ..ListingUpdate::default()
    };
    let listing = applications.update_listing(&applicant_actor, &priest_id, update)?;
    println!(
        "- listing updated | {} | specialties: {}",
        listing.name,
        listing.specialties.join(", ")
    );

    let status = applications.application_status(&priest_id)?;
    println!(
        "- dashboard view | is_priest: {} | listing: {}",
        status.is_priest,
        status
            .listing_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    if !skip_bookings {
        println!("\nBooking workflow");
        let devotee_actor = applications.actor(&devotee_id)?;
        let booking = bookings.book_priest(
            &devotee_actor,
            PriestBookingRequest {
                priest_id: listing.id.clone(),
                booking_date: Utc::now() + Duration::days(7),
                purpose: "Housewarming ceremony".to_string(),
                address: "12 Temple Street".to_string(),
                notes: Some("Morning slot preferred".to_string()),
                price: listing.base_price,
            },
        )?;
        println!(
            "- {} booked priest {} | status: {}",
            devotee_id,
            booking.priest_id,
            booking.status.label()
        );

        let confirmed = bookings.update_priest_status(&booking.id, BookingStatus::Confirmed)?;
        println!("- booking {} {}", confirmed.id, confirmed.status.label());

        let service_booking = bookings.book_service(
            &devotee_actor,
            ServiceBookingRequest {
                service_id: ServiceId("svc-havan".to_string()),
                booking_date: Utc::now() + Duration::days(10),
                notes: None,
            },
        )?;
        println!(
            "- {} booked service {} | status: {}",
            devotee_id,
            service_booking.service_id,
            service_booking.status.label()
        );

        let history = bookings.bookings_for_user(&devotee_id)?;
        println!(
            "- history for {}: {} priest booking(s), {} service booking(s)",
            devotee_id,
            history.priest_bookings.len(),
            history.service_bookings.len()
        );
    }

    if !skip_directory {
        println!("\nAdmin directory");
        let completed = profiles
            .update_details(
                &devotee_id,
                ProfileUpdate {
                    first_name: Some("Meera".to_string()),
                    last_name: Some("Iyer".to_string()),
                    avatar_url: None,
                },
            )
            .map_err(workflow_err)?;
        println!(
            "- {} completed their profile as {}",
            devotee_id,
            completed.display_name().unwrap_or_default()
        );
        let entries = directory.list_with_email(&admin_actor)?;
        for entry in filter_entries(&entries, RoleFilter::All, "") {
            println!(
                "- {} | {} | admin: {} | priest: {}",
                entry.profile.id, entry.email, entry.profile.is_admin, entry.profile.is_priest
            );
        }
        let priests = filter_entries(&entries, RoleFilter::Priests, "");
        println!("- priests on the platform: {}", priests.len());
    }

    println!("\nProfile change notifications observed: {}", notifier.generation());

    Ok(())
}

fn workflow_err(err: sanctum::workflows::profiles::RepositoryError) -> AppError {
    AppError::Workflow(err.into())
}
