//! Sample PDFs generated with lopdf, for tests.

use lopdf::content::{Content, Operation};
use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Password padding from the standard security handler.
const PAD_BYTES: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// A PDF with one page per entry of `pages`; each page shows its fragments
/// as separate text objects, top to bottom.
pub fn text_pdf(pages: &[&[&str]]) -> Vec<u8> {
    build(pages.len(), |page| {
        let mut operations = Vec::new();
        for (i, fragment) in pages[page].iter().enumerate() {
            let y = 750 - (i as i64) * 20;
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(*fragment)]),
                Operation::new("ET", vec![]),
            ]);
        }
        operations
    })
}

/// A PDF whose pages only draw vector graphics: no text layer at all.
pub fn image_only_pdf(page_count: usize) -> Vec<u8> {
    build(page_count, |_| {
        vec![
            Operation::new("q", vec![]),
            Operation::new("re", vec![72.into(), 72.into(), 400.into(), 600.into()]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]
    })
}

/// Bytes that start like a PDF but have no parseable structure.
pub fn corrupt_pdf() -> Vec<u8> {
    let mut data = b"%PDF-1.4\n".to_vec();
    for _ in 0..32 {
        data.extend_from_slice(b"garbage ");
    }
    data
}

/// [`text_pdf`] encrypted with 40-bit RC4 (`/V 1`, `/R 2`) and an empty
/// user password: it carries only owner restrictions and opens for anyone.
pub fn owner_protected_pdf(pages: &[&[&str]]) -> Vec<u8> {
    encrypted_text_pdf(pages, "")
}

/// [`text_pdf`] encrypted with 40-bit RC4 that needs `user_password` to open.
pub fn user_protected_pdf(pages: &[&[&str]], user_password: &str) -> Vec<u8> {
    encrypted_text_pdf(pages, user_password)
}

fn encrypted_text_pdf(pages: &[&[&str]], user_password: &str) -> Vec<u8> {
    let mut doc = Document::load_mem(&text_pdf(pages)).expect("generated PDF loads");

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::String(vec![0x4F; 32], StringFormat::Hexadecimal),
        "P" => -4,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(b"licita-fixture-id".to_vec(), StringFormat::Hexadecimal),
            Object::String(b"licita-fixture-id".to_vec(), StringFormat::Hexadecimal),
        ],
    );

    let key = get_encryption_key(&doc, user_password, false).expect("encryption key derives");
    if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(encrypt_id) {
        dict.set("U", Object::String(rc4(&key, &PAD_BYTES), StringFormat::Hexadecimal));
    }

    // RC4 is symmetric: the decrypting transform encrypts plaintext.
    for (&id, object) in doc.objects.iter_mut() {
        if id == encrypt_id {
            continue;
        }
        let Ok(ciphertext) = decrypt_object(&key, id, object, false) else {
            continue;
        };
        match object {
            Object::Stream(stream) => stream.set_content(ciphertext),
            Object::String(content, _) => *content = ciphertext,
            _ => {}
        }
    }

    let mut data = Vec::new();
    doc.save_to(&mut data).expect("in-memory PDF write cannot fail");
    data
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state: Vec<u8> = (0..=255).collect();
    let mut j: u8 = 0;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[i as usize]);
            state.swap(i as usize, j as usize);
            let k = state[state[i as usize].wrapping_add(state[j as usize]) as usize];
            byte ^ k
        })
        .collect()
}

fn build(page_count: usize, operations: impl Fn(usize) -> Vec<Operation>) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = (0..page_count)
        .map(|page| add_page(&mut doc, pages_id, resources_id, operations(page)).into())
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).expect("in-memory PDF write cannot fail");
    data
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    operations: Vec<Operation>,
) -> ObjectId {
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content operations encode"),
    ));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    })
}
