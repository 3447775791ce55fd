use actix_web::{http::header::ContentType, HttpResponse, Responder};

use crate::routes::views::{layout, Page};

/*
    /
*/
pub async fn index() -> impl Responder {
    let body = r#"<h1>Travel Guide Assistant...✈️</h1>
<hr>
<p>Welcome to the Travel Guide Assistant! Upload your ticket and let's start planning your trip.</p>
<h3>How to Use This Page</h3>
<ol>
<li><b>Upload Your Ticket:</b> Use the 'Ticket Info' section to upload your travel ticket in PDF format.</li>
<li><b>Enter Your Stay Duration:</b> Specify the number of days you'll be staying.</li>
<li><b>Extract Data:</b> Click the 'Extract Data' button to process your ticket and get details about your trip.</li>
<li><b>View Itinerary:</b> Go to the 'Itinerary' section to see a planned itinerary with tourist places to visit.</li>
<li><b>Find Hotels:</b> Check the 'Hotels' section for recommended hotels based on your destination and stay duration.</li>
</ol>"#;

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(layout(Page::Home, body))
}
